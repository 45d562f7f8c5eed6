use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcrError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed for {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Not found: {message}")]
    NotFoundError { message: String },

    #[error("Forbidden: {message}")]
    ForbiddenError { message: String },

    #[error("CRM returned {status}: {message}")]
    CrmError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    Access,
    Remote,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RcrError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        RcrError::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RcrError::ApiError(_) | RcrError::IoError(_) => ErrorCategory::Network,
            RcrError::CsvError(_) | RcrError::SerializationError(_) => ErrorCategory::Data,
            RcrError::ConfigError { .. }
            | RcrError::MissingConfigError { .. }
            | RcrError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RcrError::ValidationError { .. } => ErrorCategory::Validation,
            RcrError::NotFoundError { .. } | RcrError::ForbiddenError { .. } => {
                ErrorCategory::Access
            }
            RcrError::CrmError { .. } => ErrorCategory::Remote,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Access => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check connectivity to the Dynamics endpoint and retry",
            ErrorCategory::Data => "Check the payload or directory file is well formed",
            ErrorCategory::Configuration => "Review the configuration file and environment variables",
            ErrorCategory::Validation => "Correct the submitted values and resubmit",
            ErrorCategory::Access => "Check the licence number and postcode or credentials",
            ErrorCategory::Remote => "Inspect the CRM error message; the request was rejected",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RcrError::NotFoundError { .. } => "Licence not found".to_string(),
            RcrError::ForbiddenError { .. } => "Access denied".to_string(),
            RcrError::ValidationError { field, reason } => {
                format!("Invalid {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RcrError>;
