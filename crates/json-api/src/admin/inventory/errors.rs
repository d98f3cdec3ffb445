//! Errors

use salvo::http::StatusError;
use tracing::error;

use attar_app::domain::inventory::InventoryServiceError;

pub(crate) fn into_status_error(error: InventoryServiceError) -> StatusError {
    match error {
        InventoryServiceError::NotFound => {
            StatusError::not_found().brief("Inventory record not found")
        }
        InventoryServiceError::InvalidReference => StatusError::not_found().brief("Perfume not found"),
        InventoryServiceError::NegativeQuantity(_) | InventoryServiceError::OutOfRange(_) => {
            StatusError::bad_request().brief(error.to_string())
        }
        InventoryServiceError::MissingRequiredData | InventoryServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid inventory payload")
        }
        InventoryServiceError::InvalidChangeType(source) => {
            error!("stored inventory log has an unknown change type: {source}");

            StatusError::internal_server_error()
        }
        InventoryServiceError::Sql(source) => {
            error!("inventory storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn negative_quantity_keeps_its_message() {
        let status = into_status_error(InventoryServiceError::NegativeQuantity(-2));

        assert_eq!(status.code, StatusCode::BAD_REQUEST);
        assert_eq!(status.brief, "stock quantity cannot be negative (got -2)");
    }

    #[test]
    fn missing_record_is_not_found() {
        assert_eq!(
            into_status_error(InventoryServiceError::NotFound).code,
            StatusCode::NOT_FOUND
        );
    }
}
