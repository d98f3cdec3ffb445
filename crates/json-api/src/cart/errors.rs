//! Errors

use salvo::http::StatusError;
use tracing::error;

use attar_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::NotFound => StatusError::not_found().brief("Perfume is not in the cart"),
        CartsServiceError::InvalidReference => StatusError::not_found().brief("Perfume not found"),
        CartsServiceError::MissingRequiredData | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::Cart(source) => StatusError::bad_request().brief(source.to_string()),
        CartsServiceError::Sql(source) => {
            error!("cart storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
