use crate::core::credential::mock_access_token;
use crate::domain::ports::TokenService;
use crate::utils::error::{RcrError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Hands out simulator-recognisable tokens; the password picks the status
/// the simulated roles call will answer with.
#[derive(Debug, Clone, Default)]
pub struct MockTokenService;

#[async_trait]
impl TokenService for MockTokenService {
    async fn access_token(&self, _username: &str, password: &str) -> Result<String> {
        Ok(mock_access_token(password))
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Resource-owner password grant against an Azure AD authority.
pub struct AadTokenService {
    client: Client,
    token_url: String,
    client_id: String,
    scope: String,
}

impl AadTokenService {
    pub fn new(authority: &str, client_id: &str, scope: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            token_url: format!("{}/oauth2/v2.0/token", authority.trim_end_matches('/')),
            client_id: client_id.to_string(),
            scope: scope.to_string(),
        })
    }
}

#[async_trait]
impl TokenService for AadTokenService {
    async fn access_token(&self, username: &str, password: &str) -> Result<String> {
        tracing::debug!("Requesting access token for {} from {}", username, self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.client_id.as_str()),
                ("scope", self.scope.as_str()),
                ("username", username),
                ("password", password),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            tracing::warn!("Authority rejected credentials for {}: {}", username, status);
            return Err(RcrError::ForbiddenError {
                message: format!("authentication failed for {}", username),
            });
        }

        let token: TokenResponse = response.error_for_status()?.json().await?;
        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_token_embeds_password() {
        let token = tokio_test::block_on(MockTokenService.access_token("admin", "200")).unwrap();
        assert_eq!(token, "mock_bearer_token_200");
    }
}
