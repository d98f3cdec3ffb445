//! Errors

use salvo::http::StatusError;
use tracing::error;

use attar_app::identity::IdentityError;

pub(crate) fn into_status_error(error: IdentityError) -> StatusError {
    match error {
        IdentityError::MissingCredentials => {
            StatusError::unauthorized().brief("Missing or invalid Authorization header")
        }
        IdentityError::InvalidToken | IdentityError::InvalidUserId(_) => {
            StatusError::unauthorized().brief("Invalid access token")
        }
        IdentityError::Http(source) => {
            error!("identity provider request failed: {source}");

            StatusError::bad_gateway()
        }
        IdentityError::UnexpectedResponse(body) => {
            error!("identity provider returned an unexpected response: {body}");

            StatusError::bad_gateway()
        }
    }
}
