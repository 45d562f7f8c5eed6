use crate::domain::crm::CrmReply;
use crate::domain::ports::CrmTransport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use std::time::Duration;

/// CRM transport talking to a live Dynamics Web API.
pub struct DynamicsHttpTransport {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
}

impl DynamicsHttpTransport {
    pub fn new(endpoint: &str, timeout: Duration, api_token: Option<String>) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl CrmTransport for DynamicsHttpTransport {
    async fn post(
        &self,
        path: &str,
        authorization: Option<&str>,
        body: serde_json::Value,
    ) -> Result<CrmReply> {
        let url = format!("{}{}", self.endpoint, path);
        tracing::debug!("Making CRM request to: {}", url);

        let mut request = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .json(&body);

        // An explicit user credential wins over the service token.
        if let Some(authorization) = authorization {
            request = request.header(AUTHORIZATION, authorization);
        } else if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("CRM response status: {}", status);

        let text = response.text().await?;
        // Only successful replies must be JSON; failures often carry text or HTML.
        let body = match text.trim() {
            "" | "null" => None,
            content => match serde_json::from_str(content) {
                Ok(value) => Some(value),
                Err(e) if (200..300).contains(&status) => return Err(e.into()),
                Err(e) => {
                    tracing::debug!("Ignoring non-JSON body of {} reply: {}", status, e);
                    None
                }
            },
        };

        Ok(CrmReply { status, body })
    }
}
