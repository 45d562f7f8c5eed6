//! In-process stand-in for the Dynamics RCR actions.
//!
//! Each call is answered from the read-only [`CrmDirectory`] and simple
//! structural rules. Business-rule failures never surface as Rust errors: the
//! simulator always produces a response, with failures carried in the payload
//! (lookups and activities) or the status code (roles), as Dynamics does.

use crate::core::credential::parse_simulated_credential;
use crate::core::directory::CrmDirectory;
use crate::domain::crm::{
    ActivityQuery, CrmActivity, CrmIdentity, CrmLicence, CrmOperation, CrmReply, LicenceQuery,
};
use crate::utils::error::Result;
use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::Arc;

pub const PERMISSION_NOT_FOUND: &str = "Unable to retrieve permission";
pub const INVALID_ACTIVITY: &str = "Invalid contact id, season or status";
pub const ADMIN_ROLE: &str = "RcrAdminUser";

const CONTACT_ID_PATTERN: &str = r"^contact-identifier-\d+$";

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedCrmRequest {
    LookupLicence(LicenceQuery),
    CreateActivity(ActivityQuery),
    UpdateActivity(ActivityQuery),
    GetRoles { authorization: Option<String> },
}

impl SimulatedCrmRequest {
    pub fn operation(&self) -> CrmOperation {
        match self {
            SimulatedCrmRequest::LookupLicence(_) => CrmOperation::LookupLicence,
            SimulatedCrmRequest::CreateActivity(_) => CrmOperation::CreateActivity,
            SimulatedCrmRequest::UpdateActivity(_) => CrmOperation::UpdateActivity,
            SimulatedCrmRequest::GetRoles { .. } => CrmOperation::GetRoles,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimulatedPayload {
    Licence(CrmLicence),
    Activity(CrmActivity),
    Identity(CrmIdentity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedCrmResponse {
    pub status: u16,
    pub payload: Option<SimulatedPayload>,
}

impl SimulatedCrmResponse {
    fn new(status: u16, payload: SimulatedPayload) -> Self {
        Self {
            status,
            payload: Some(payload),
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            payload: None,
        }
    }

    pub fn into_reply(self) -> Result<CrmReply> {
        let body = match self.payload {
            Some(SimulatedPayload::Licence(licence)) => Some(serde_json::to_value(licence)?),
            Some(SimulatedPayload::Activity(activity)) => Some(serde_json::to_value(activity)?),
            Some(SimulatedPayload::Identity(identity)) => Some(serde_json::to_value(identity)?),
            None => None,
        };
        Ok(CrmReply {
            status: self.status,
            body,
        })
    }
}

pub struct CrmContractSimulator {
    directory: Arc<CrmDirectory>,
    contact_id_pattern: Regex,
    current_year: Option<i32>,
}

impl CrmContractSimulator {
    pub fn new(directory: Arc<CrmDirectory>) -> Self {
        Self {
            directory,
            contact_id_pattern: Regex::new(CONTACT_ID_PATTERN).expect("contact id pattern is valid"),
            current_year: None,
        }
    }

    /// Pin the year used for the season recency rule.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    fn current_year(&self) -> i32 {
        self.current_year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn handle(&self, request: &SimulatedCrmRequest) -> SimulatedCrmResponse {
        tracing::debug!("Simulating CRM operation {}", request.operation());
        match request {
            SimulatedCrmRequest::LookupLicence(query) => self.lookup_licence(query),
            SimulatedCrmRequest::CreateActivity(query) => {
                self.activity(query, activity_status(CrmOperation::CreateActivity))
            }
            SimulatedCrmRequest::UpdateActivity(query) => {
                self.activity(query, activity_status(CrmOperation::UpdateActivity))
            }
            SimulatedCrmRequest::GetRoles { authorization } => self.roles(authorization.as_deref()),
        }
    }

    /// Decode a raw POST into a request, answer it and encode the reply.
    ///
    /// Paths that match no operation get a 404 and bodies that cannot be read
    /// as the operation's JSON object a 400; neither carries a payload. An
    /// activity body missing its contact id or season is answered with the
    /// invalid-activity payload like any other rejected activity.
    pub fn dispatch(
        &self,
        path: &str,
        authorization: Option<&str>,
        body: &serde_json::Value,
    ) -> Result<CrmReply> {
        let Some(operation) = CrmOperation::from_path(path) else {
            tracing::warn!("No simulated CRM operation for path {}", path);
            return SimulatedCrmResponse::empty(404).into_reply();
        };

        let request = match operation {
            CrmOperation::LookupLicence => match serde_json::from_value(body.clone()) {
                Ok(query) => SimulatedCrmRequest::LookupLicence(query),
                Err(e) => {
                    tracing::warn!("Malformed {} request body: {}", operation, e);
                    return SimulatedCrmResponse::empty(400).into_reply();
                }
            },
            CrmOperation::CreateActivity | CrmOperation::UpdateActivity => {
                let Some(fields) = body.as_object() else {
                    tracing::warn!("{} request body is not a JSON object", operation);
                    return SimulatedCrmResponse::empty(400).into_reply();
                };
                let Some(query) = decode_activity(fields) else {
                    tracing::debug!("{} request lacks a contact id or season", operation);
                    return SimulatedCrmResponse::new(
                        activity_status(operation),
                        SimulatedPayload::Activity(CrmActivity::error(INVALID_ACTIVITY)),
                    )
                    .into_reply();
                };
                if operation == CrmOperation::CreateActivity {
                    SimulatedCrmRequest::CreateActivity(query)
                } else {
                    SimulatedCrmRequest::UpdateActivity(query)
                }
            }
            CrmOperation::GetRoles => SimulatedCrmRequest::GetRoles {
                authorization: authorization.map(str::to_string),
            },
        };

        self.handle(&request).into_reply()
    }

    fn lookup_licence(&self, query: &LicenceQuery) -> SimulatedCrmResponse {
        let licence = match self.directory.get(&query.permission_number) {
            Some(entry) => CrmLicence {
                id: Some(entry.contact_id.clone()),
                permission_number: Some(entry.permission_number.clone()),
                postcode: Some(entry.postcode.clone()),
                ..CrmLicence::default()
            },
            None => {
                tracing::debug!("Permission {} not in directory", query.permission_number);
                CrmLicence::error(PERMISSION_NOT_FOUND)
            }
        };
        SimulatedCrmResponse::new(200, SimulatedPayload::Licence(licence))
    }

    fn activity(&self, query: &ActivityQuery, status: u16) -> SimulatedCrmResponse {
        let valid = self.contact_id_pattern.is_match(&query.contact_id)
            && query.season >= self.current_year() - 1
            && query.status.is_some();

        let activity = if valid {
            CrmActivity {
                id: Some(format!("{}{}", query.contact_id, uuid::Uuid::new_v4())),
                ..CrmActivity::default()
            }
        } else {
            CrmActivity::error(INVALID_ACTIVITY)
        };
        SimulatedCrmResponse::new(status, SimulatedPayload::Activity(activity))
    }

    fn roles(&self, authorization: Option<&str>) -> SimulatedCrmResponse {
        let token = parse_simulated_credential(authorization);
        if token.matched && (200..300).contains(&token.status) {
            SimulatedCrmResponse::new(
                token.status,
                SimulatedPayload::Identity(CrmIdentity {
                    roles: Some(ADMIN_ROLE.to_string()),
                }),
            )
        } else {
            SimulatedCrmResponse::empty(token.status)
        }
    }
}

/// Transport status of an activity reply: 201 for create, 200 otherwise.
fn activity_status(operation: CrmOperation) -> u16 {
    match operation {
        CrmOperation::CreateActivity => 201,
        _ => 200,
    }
}

/// Read an activity body field by field, so absent or mistyped fields reach
/// the business rules instead of failing the decode.
fn decode_activity(fields: &serde_json::Map<String, serde_json::Value>) -> Option<ActivityQuery> {
    Some(ActivityQuery {
        contact_id: fields.get("contactId")?.as_str()?.to_string(),
        season: i32::try_from(fields.get("season")?.as_i64()?).ok()?,
        status: fields
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
    })
}
