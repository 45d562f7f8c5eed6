use crate::domain::crm::{
    ActivityQuery, ActivityStatus, CrmActivity, CrmIdentity, CrmLicence, CrmOperation, CrmReply,
    LicenceQuery, ReturnStatus,
};
use crate::domain::model::{Contact, Identity, Licence};
use crate::domain::ports::{CrmLookupService, CrmTransport, TokenService};
use crate::utils::error::{RcrError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const PERMISSION_KEY_LENGTH: usize = 6;

/// Permission keys are the trailing six characters of a licence number.
pub fn permission_key(licence_number: &str) -> &str {
    let trimmed = licence_number.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .nth(PERMISSION_KEY_LENGTH - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &trimmed[start..]
}

fn normalise_postcode(postcode: &str) -> String {
    postcode
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// [`CrmLookupService`] over any [`CrmTransport`], live or simulated.
pub struct DynamicsCrmService {
    transport: Arc<dyn CrmTransport>,
    tokens: Arc<dyn TokenService>,
    api_path: String,
}

impl DynamicsCrmService {
    pub fn new(
        transport: Arc<dyn CrmTransport>,
        tokens: Arc<dyn TokenService>,
        api_path: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            tokens,
            api_path: api_path.into(),
        }
    }

    async fn call(
        &self,
        operation: CrmOperation,
        authorization: Option<&str>,
        body: serde_json::Value,
    ) -> Result<CrmReply> {
        let path = operation.path(&self.api_path);
        let reply = self.transport.post(&path, authorization, body).await?;
        tracing::debug!("{} answered with status {}", operation, reply.status);
        Ok(reply)
    }

    fn decode<T: DeserializeOwned>(operation: CrmOperation, reply: CrmReply) -> Result<T> {
        match reply.body {
            Some(body) => Ok(serde_json::from_value(body)?),
            None => Err(RcrError::CrmError {
                status: reply.status,
                message: format!("{} returned no payload", operation),
            }),
        }
    }

    async fn activity(
        &self,
        operation: CrmOperation,
        contact_id: &str,
        season: i32,
        status: ActivityStatus,
    ) -> Result<String> {
        let query = ActivityQuery {
            contact_id: contact_id.to_string(),
            season,
            status: Some(status.as_str().to_string()),
        };
        let reply = self.call(operation, None, serde_json::to_value(&query)?).await?;
        let reply_status = reply.status;
        if !reply.is_success() {
            return Err(RcrError::CrmError {
                status: reply_status,
                message: format!("{} failed", operation),
            });
        }

        let activity: CrmActivity = Self::decode(operation, reply)?;
        if activity.is_error() {
            let message = activity.error_message().unwrap_or("unknown error").to_string();
            tracing::warn!("{} rejected for {} / {}: {}", operation, contact_id, season, message);
            return Err(RcrError::CrmError {
                status: reply_status,
                message,
            });
        }

        let id = activity.id.ok_or_else(|| RcrError::CrmError {
            status: reply_status,
            message: format!("{} returned no activity id", operation),
        })?;
        tracing::info!("{} {} for {} season {}", status.as_str(), id, contact_id, season);
        Ok(id)
    }
}

#[async_trait]
impl CrmLookupService for DynamicsCrmService {
    async fn get_licence(&self, licence_number: &str, postcode: &str) -> Result<Licence> {
        let permission_number = permission_key(licence_number);
        let query = LicenceQuery {
            permission_number: permission_number.to_string(),
        };
        let reply = self
            .call(CrmOperation::LookupLicence, None, serde_json::to_value(&query)?)
            .await?;
        if !reply.is_success() {
            return Err(RcrError::CrmError {
                status: reply.status,
                message: "licence lookup failed".to_string(),
            });
        }

        let licence: CrmLicence = Self::decode(CrmOperation::LookupLicence, reply)?;
        if licence.is_error() {
            return Err(RcrError::NotFoundError {
                message: licence
                    .error_message()
                    .unwrap_or("licence not found")
                    .to_string(),
            });
        }

        let (Some(contact_id), Some(crm_postcode)) = (licence.id, licence.postcode) else {
            return Err(RcrError::NotFoundError {
                message: format!("no contact for permission {}", permission_number),
            });
        };

        if normalise_postcode(&crm_postcode) != normalise_postcode(postcode) {
            tracing::warn!("Postcode verification failed for permission {}", permission_number);
            return Err(RcrError::ForbiddenError {
                message: format!("postcode does not match permission {}", permission_number),
            });
        }

        Ok(Licence {
            licence_number: licence
                .permission_number
                .unwrap_or_else(|| permission_number.to_string()),
            contact: Contact {
                id: contact_id,
                postcode: crm_postcode,
            },
        })
    }

    async fn create_activity(&self, contact_id: &str, season: i32) -> Result<String> {
        self.activity(
            CrmOperation::CreateActivity,
            contact_id,
            season,
            ActivityStatus::Started,
        )
        .await
    }

    async fn update_activity(&self, contact_id: &str, season: i32) -> Result<String> {
        self.activity(
            CrmOperation::UpdateActivity,
            contact_id,
            season,
            ActivityStatus::Submitted,
        )
        .await
    }

    async fn get_authenticated_user_roles(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Identity> {
        let token = self.tokens.access_token(username, password).await?;
        let authorization = format!("Bearer {}", token);
        let reply = self
            .call(
                CrmOperation::GetRoles,
                Some(&authorization),
                serde_json::json!({}),
            )
            .await?;

        match reply.status {
            401 | 403 => {
                return Err(RcrError::ForbiddenError {
                    message: format!("no CRM roles for {}", username),
                })
            }
            status if !(200..300).contains(&status) => {
                return Err(RcrError::CrmError {
                    status,
                    message: "role lookup failed".to_string(),
                })
            }
            _ => {}
        }

        let identity: CrmIdentity = Self::decode(CrmOperation::GetRoles, reply)?;
        let roles = identity
            .roles
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|role| !role.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Identity {
            username: username.to_string(),
            roles,
        })
    }
}
