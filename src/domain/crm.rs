//! Wire contract shared by the Dynamics client and the contract simulator.

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_PATH: &str = "/api/data/v9.0";

/// Value of `returnStatus` on an error payload.
pub const RETURN_STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrmOperation {
    LookupLicence,
    CreateActivity,
    UpdateActivity,
    GetRoles,
}

impl CrmOperation {
    pub const ALL: [CrmOperation; 4] = [
        CrmOperation::LookupLicence,
        CrmOperation::CreateActivity,
        CrmOperation::UpdateActivity,
        CrmOperation::GetRoles,
    ];

    pub fn action(&self) -> &'static str {
        match self {
            CrmOperation::LookupLicence => "defra_GetContactByLicenseNumber",
            CrmOperation::CreateActivity => "defra_CreateRCRActivity",
            CrmOperation::UpdateActivity => "defra_UpdateRCRActivity",
            CrmOperation::GetRoles => "defra_GetRcrRolesByUser",
        }
    }

    pub fn path(&self, api_path: &str) -> String {
        format!("{}/{}", api_path.trim_end_matches('/'), self.action())
    }

    /// Resolve the operation from a request path by its action suffix.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.split('?').next().unwrap_or(path);
        Self::ALL
            .into_iter()
            .find(|op| path.ends_with(&format!("/{}", op.action())))
    }
}

impl std::fmt::Display for CrmOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.action())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Started,
    Submitted,
}

impl ActivityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityStatus::Started => "Started",
            ActivityStatus::Submitted => "Submitted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenceQuery {
    pub permission_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    pub contact_id: String,
    pub season: i32,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmLicence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmActivity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrmIdentity {
    #[serde(default)]
    pub roles: Option<String>,
}

/// Error signalling carried inside a payload rather than the transport status.
pub trait ReturnStatus {
    fn return_status(&self) -> Option<&str>;
    fn error_message(&self) -> Option<&str>;

    fn is_error(&self) -> bool {
        self.return_status() == Some(RETURN_STATUS_ERROR)
    }
}

impl ReturnStatus for CrmLicence {
    fn return_status(&self) -> Option<&str> {
        self.return_status.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl ReturnStatus for CrmActivity {
    fn return_status(&self) -> Option<&str> {
        self.return_status.as_deref()
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl CrmLicence {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            return_status: Some(RETURN_STATUS_ERROR.to_string()),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

impl CrmActivity {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            return_status: Some(RETURN_STATUS_ERROR.to_string()),
            error_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Raw answer from a CRM transport: status plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct CrmReply {
    pub status: u16,
    pub body: Option<serde_json::Value>,
}

impl CrmReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_resolved_from_full_url() {
        assert_eq!(
            CrmOperation::from_path(
                "https://org.crm11.dynamics.com/api/data/v9.0/defra_CreateRCRActivity"
            ),
            Some(CrmOperation::CreateActivity)
        );
        assert_eq!(
            CrmOperation::from_path("/api/data/v9.0/defra_GetRcrRolesByUser?x=1"),
            Some(CrmOperation::GetRoles)
        );
        assert_eq!(CrmOperation::from_path("/api/data/v9.0/contacts"), None);
    }

    #[test]
    fn test_error_payload_wire_shape() {
        let json = serde_json::to_value(CrmLicence::error("Unable to retrieve permission")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "returnStatus": "error",
                "errorMessage": "Unable to retrieve permission"
            })
        );
    }

    #[test]
    fn test_activity_query_tolerates_missing_status() {
        let query: ActivityQuery =
            serde_json::from_str(r#"{"contactId": "contact-identifier-1", "season": 2026}"#)
                .unwrap();
        assert_eq!(query.status, None);
    }
}
