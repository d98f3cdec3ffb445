//! Identity errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    /// A registered checkout arrived without a user id or a bearer token.
    #[error("missing credentials")]
    MissingCredentials,

    /// The identity provider rejected the token.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The identity provider returned a user id that is not a UUID.
    #[error("identity provider returned an invalid user id")]
    InvalidUserId(#[source] uuid::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from identity provider: {0}")]
    UnexpectedResponse(String),
}
