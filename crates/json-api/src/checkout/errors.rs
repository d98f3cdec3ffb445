//! Errors

use salvo::http::StatusError;
use tracing::error;

use attar_app::{
    checkout::{CheckoutError, PersistenceError},
    payment_provider::PaymentProviderError,
};

use crate::auth;

pub(crate) fn into_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::Validation(source) => StatusError::bad_request().brief(source.to_string()),
        CheckoutError::PaymentProvider(PaymentProviderError::NotCompleted { status }) => {
            StatusError::payment_required().brief(format!("Payment is {status}"))
        }
        CheckoutError::PaymentProvider(source) => {
            error!("payment provider request failed: {source}");

            StatusError::bad_gateway().brief("Payment provider unavailable, please try again")
        }
        CheckoutError::Authentication(source) => auth::errors::into_status_error(source),
        CheckoutError::Persistence(source) => persistence_status_error(&source),
    }
}

fn persistence_status_error(error: &PersistenceError) -> StatusError {
    match error {
        PersistenceError::UnknownCheckout(intent_id)
        | PersistenceError::AmountMismatch { intent_id, .. }
        | PersistenceError::CurrencyMismatch { intent_id, .. } => {
            error!(intent_id = %intent_id, "payment needs manual reconciliation: {error}");
        }
        _ => error!("checkout persistence failed: {error}"),
    }

    StatusError::internal_server_error()
}

#[cfg(test)]
mod tests {
    use attar_app::{checkout::ValidationError, identity::IdentityError};
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn errors_map_to_status_codes() {
        let cases = [
            (
                CheckoutError::from(ValidationError::EmptyCart),
                StatusCode::BAD_REQUEST,
            ),
            (
                CheckoutError::from(PaymentProviderError::Timeout),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CheckoutError::from(PaymentProviderError::NotCompleted {
                    status: "pending".to_string(),
                }),
                StatusCode::PAYMENT_REQUIRED,
            ),
            (
                CheckoutError::from(IdentityError::MissingCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (
                CheckoutError::from(PersistenceError::UnknownCheckout("pi_1".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(into_status_error(error).code, expected);
        }
    }
}
