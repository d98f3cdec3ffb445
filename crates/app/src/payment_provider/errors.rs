//! Payment provider errors.

use thiserror::Error;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentProviderError {
    /// The request did not complete within the configured timeout.
    #[error("payment provider request timed out")]
    Timeout,

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    /// The provider answered with a non-2xx response.
    #[error("payment provider returned {status}: {body}")]
    UnexpectedResponse { status: u16, body: String },

    /// The configured base URL cannot carry a path.
    #[error("invalid payment provider base url: {0}")]
    InvalidBaseUrl(String),

    /// The provider answered for a different intent than the one requested.
    #[error("requested payment intent {requested}, provider returned {returned}")]
    IntentMismatch { requested: String, returned: String },

    /// The payment intent exists but has not been paid.
    #[error("payment intent status is {status}, not completed")]
    NotCompleted { status: String },
}

impl From<reqwest::Error> for PaymentProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(error)
        }
    }
}
