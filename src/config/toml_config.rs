use crate::domain::crm::DEFAULT_API_PATH;
use crate::utils::error::{RcrError, Result};
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_positive_number,
    validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub dynamics: DynamicsConfig,
    pub active_directory: Option<ActiveDirectoryConfig>,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DynamicsMode {
    #[default]
    Mock,
    Dynamics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsConfig {
    #[serde(default)]
    pub mode: DynamicsMode,
    pub endpoint: Option<String>,
    #[serde(default = "default_api_path")]
    pub api_path: String,
    pub timeout_seconds: Option<u64>,
    pub api_token: Option<String>,
}

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

impl Default for DynamicsConfig {
    fn default() -> Self {
        Self {
            mode: DynamicsMode::Mock,
            endpoint: None,
            api_path: default_api_path(),
            timeout_seconds: None,
            api_token: None,
        }
    }
}

impl DynamicsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

/// Azure AD authority used to authenticate administrative users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveDirectoryConfig {
    pub authority: String,
    pub identity_client_id: String,
    pub scope: Option<String>,
}

impl ActiveDirectoryConfig {
    /// Token scope, defaulting to the Dynamics resource itself.
    pub fn scope_for(&self, endpoint: &str) -> String {
        self.scope
            .clone()
            .unwrap_or_else(|| format!("{}/.default", endpoint.trim_end_matches('/')))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MockConfig {
    pub directory_file: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RcrError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Load `path` if it exists, otherwise fall back to mock-mode defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "No config at {}, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RcrError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the environment value; unknown variables are kept verbatim.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn is_mock(&self) -> bool {
        self.dynamics.mode == DynamicsMode::Mock
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("dynamics.api_path", &self.dynamics.api_path)?;
        if let Some(timeout) = self.dynamics.timeout_seconds {
            validate_positive_number("dynamics.timeout_seconds", timeout, 1)?;
        }

        if self.dynamics.mode == DynamicsMode::Dynamics {
            let endpoint = validate_required_field("dynamics.endpoint", &self.dynamics.endpoint)?;
            validate_url("dynamics.endpoint", endpoint)?;

            let aad = validate_required_field("active_directory", &self.active_directory)?;
            validate_url("active_directory.authority", &aad.authority)?;
            validate_non_empty_string(
                "active_directory.identity_client_id",
                &aad.identity_client_id,
            )?;
        }

        if let Some(file) = &self.mock.directory_file {
            validate_file_extensions("mock.directory_file", std::slice::from_ref(file), &["csv"])?;
        }

        if let Some(level) = &self.logging.level {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(RcrError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}
