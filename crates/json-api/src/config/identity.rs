//! Identity Config

use std::time::Duration;

use attar_app::identity::IdentityProviderConfig;
use clap::Args;

/// Identity provider settings.
#[derive(Debug, Args)]
pub struct IdentityConfig {
    /// Identity provider base URL
    #[arg(long, env = "IDENTITY_PROVIDER_URL")]
    pub identity_provider_url: String,

    /// Identity provider API key
    #[arg(long, env = "IDENTITY_PROVIDER_API_KEY", hide_env_values = true)]
    pub identity_provider_api_key: String,

    /// Identity provider request timeout in seconds
    #[arg(long, env = "IDENTITY_PROVIDER_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub identity_provider_timeout_seconds: u64,
}

impl IdentityConfig {
    pub(crate) fn provider_config(&self) -> IdentityProviderConfig {
        IdentityProviderConfig {
            base_url: self.identity_provider_url.clone(),
            api_key: self.identity_provider_api_key.clone(),
            timeout: Duration::from_secs(self.identity_provider_timeout_seconds),
        }
    }
}
