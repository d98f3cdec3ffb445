//! Errors

use salvo::http::StatusError;
use tracing::error;

use attar_app::{domain::orders::OrdersServiceError, fulfilment::FulfilmentError};

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference => {
            StatusError::bad_request().brief("Order references an unknown perfume")
        }
        OrdersServiceError::MissingRequiredData | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order payload")
        }
        OrdersServiceError::InvalidStatus(source) => {
            error!("stored order has an unknown status: {source}");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn fulfilment_status_error(error: FulfilmentError) -> StatusError {
    match error {
        FulfilmentError::Orders(source) => into_status_error(source),
    }
}

#[cfg(test)]
mod tests {
    use attar::orders::UnknownStatus;
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (OrdersServiceError::NotFound, StatusCode::NOT_FOUND),
            (OrdersServiceError::AlreadyExists, StatusCode::CONFLICT),
            (OrdersServiceError::InvalidData, StatusCode::BAD_REQUEST),
            (
                OrdersServiceError::InvalidStatus(UnknownStatus("lost".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let label = error.to_string();

            assert_eq!(into_status_error(error).code, expected, "{label}");
        }
    }

    #[test]
    fn fulfilment_errors_follow_order_errors() {
        let error = FulfilmentError::from(OrdersServiceError::NotFound);

        assert_eq!(fulfilment_status_error(error).code, StatusCode::NOT_FOUND);
    }
}
