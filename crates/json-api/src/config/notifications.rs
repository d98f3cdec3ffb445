//! Notifications Config

use std::time::Duration;

use attar_app::notifications::EmailConfig;
use clap::Args;

/// Email provider settings.
#[derive(Debug, Args)]
pub struct NotificationsConfig {
    /// Email provider API base URL
    #[arg(long, env = "EMAIL_PROVIDER_URL", default_value = "https://api.resend.com")]
    pub email_provider_url: String,

    /// Email provider API key
    #[arg(long, env = "EMAIL_PROVIDER_API_KEY", hide_env_values = true)]
    pub email_provider_api_key: String,

    /// Sender for order emails
    #[arg(long, env = "EMAIL_FROM", default_value = "Attar <orders@attar.ae>")]
    pub email_from: String,

    /// Email provider request timeout in seconds
    #[arg(long, env = "EMAIL_PROVIDER_TIMEOUT_SECONDS", default_value_t = 10_u64)]
    pub email_provider_timeout_seconds: u64,
}

impl NotificationsConfig {
    pub(crate) fn email_config(&self) -> EmailConfig {
        EmailConfig {
            base_url: self.email_provider_url.clone(),
            api_key: self.email_provider_api_key.clone(),
            from: self.email_from.clone(),
            timeout: Duration::from_secs(self.email_provider_timeout_seconds),
        }
    }
}
