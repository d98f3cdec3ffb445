//! Notification errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// No email address is known for the recipient.
    #[error("no recipient email address")]
    MissingRecipient,

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from email provider: {0}")]
    UnexpectedResponse(String),
}
