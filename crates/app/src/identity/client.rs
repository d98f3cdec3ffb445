//! HTTP client for the identity provider.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, StatusCode};

use crate::identity::{
    IdentityError,
    models::{IdentityUser, IntrospectionBody},
};

/// Configuration for connecting to the identity provider.
#[derive(Debug, Clone)]
pub struct IdentityProviderConfig {
    /// Base URL, e.g. `"https://project.supabase.co"`.
    pub base_url: String,

    /// Public API key sent in the `apikey` header.
    pub api_key: String,

    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
    config: IdentityProviderConfig,
    http: Client,
}

impl HttpIdentityProvider {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: IdentityProviderConfig) -> Result<Self, IdentityError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn introspect(&self, access_token: &str) -> Result<IdentityUser, IdentityError> {
        let url = format!(
            "{}/auth/v1/user",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header("apikey", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(IdentityError::InvalidToken);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(IdentityError::UnexpectedResponse(format!(
                "user request failed with status {status}: {text}"
            )));
        }

        let body: IntrospectionBody = response.json().await?;

        IdentityUser::try_from(body).map_err(IdentityError::InvalidUserId)
    }
}

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the user behind an access token.
    async fn introspect(&self, access_token: &str) -> Result<IdentityUser, IdentityError>;
}
