//! HTTP client for the email provider.

use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use tracing::debug;

use crate::notifications::{
    NotificationError,
    models::{Notification, SendEmailBody, SentEmailBody},
    templates::render,
};

/// Configuration for connecting to the email provider.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Base URL, e.g. `"https://api.resend.com"`.
    pub base_url: String,

    pub api_key: String,

    /// Sender address, e.g. `"Attar <orders@example.com>"`.
    pub from: String,

    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpNotifier {
    config: EmailConfig,
    http: Client,
}

impl HttpNotifier {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: EmailConfig) -> Result<Self, NotificationError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send(&self, notification: &Notification) -> Result<String, NotificationError> {
        if notification.recipient_email.trim().is_empty() {
            return Err(NotificationError::MissingRecipient);
        }

        let email = render(notification);
        let url = format!("{}/emails", self.config.base_url.trim_end_matches('/'));

        let body = SendEmailBody {
            from: &self.config.from,
            to: [&notification.recipient_email],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotificationError::UnexpectedResponse(format!(
                "email request failed with status {status}: {text}"
            )));
        }

        let sent: SentEmailBody = response.json().await?;

        debug!(
            order_uuid = %notification.order,
            kind = %notification.kind,
            message_id = %sent.id,
            "email accepted by provider"
        );

        Ok(sent.id)
    }
}

#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Render and send a notification, returning the provider message id.
    async fn send(&self, notification: &Notification) -> Result<String, NotificationError>;
}
