//! Verify Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use attar_app::{
    checkout::{CheckoutError, models::VerificationResult},
    payment_provider::PaymentProviderError,
};

use crate::{
    checkout::errors::into_status_error,
    extensions::*,
    observability::{VerificationOutcome, observe_verification},
    state::State,
};

/// Verification Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerificationResponse {
    /// The order materialized for the payment
    pub order_uuid: Uuid,

    /// Whether this call created the order
    pub created: bool,
}

impl From<VerificationResult> for VerificationResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            order_uuid: result.order.into_uuid(),
            created: result.created,
        }
    }
}

pub(crate) const fn success_outcome(result: &VerificationResult) -> VerificationOutcome {
    if result.created {
        VerificationOutcome::Created
    } else {
        VerificationOutcome::Existing
    }
}

pub(crate) const fn failure_outcome(error: &CheckoutError) -> VerificationOutcome {
    match error {
        CheckoutError::PaymentProvider(PaymentProviderError::NotCompleted { .. }) => {
            VerificationOutcome::Unpaid
        }
        _ => VerificationOutcome::Failed,
    }
}

/// Verify Payment Handler
///
/// Called when the customer returns from the payment provider. Verifying
/// the same intent again returns the same order.
#[endpoint(
    tags("checkout"),
    summary = "Verify Payment",
    responses(
        (status_code = StatusCode::OK, description = "Order materialized"),
        (status_code = StatusCode::PAYMENT_REQUIRED, description = "Payment not completed"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment needs manual reconciliation"),
    ),
)]
pub(crate) async fn handler(
    payment_intent_id: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<VerificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let intent_id = payment_intent_id
        .into_inner()
        .filter(|intent_id| !intent_id.trim().is_empty())
        .ok_or_else(|| StatusError::bad_request().brief("payment_intent_id is required"))?;

    let result = match state.app.checkout.verify(&intent_id).await {
        Ok(result) => result,
        Err(error) => {
            observe_verification(failure_outcome(&error));

            return Err(into_status_error(error));
        }
    };

    observe_verification(success_outcome(&result));

    if !result.warnings.is_empty() {
        info!(
            intent_id = %intent_id,
            order_uuid = %result.order,
            warnings = result.warnings.len(),
            "order materialized with follow-up failures"
        );
    }

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use attar::ids::OrderUuid;
    use attar_app::{
        checkout::PersistenceError,
        partial_failure::{FailureStep, PartialFailure},
    };
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, public_service};

    use super::*;

    fn make_service(app: MockApp) -> Service {
        public_service(app, Router::with_path("checkout/verify").get(handler))
    }

    #[tokio::test]
    async fn test_verify_returns_order() -> TestResult {
        let mut app = MockApp::default();
        let order = OrderUuid::new();

        app.checkout
            .expect_verify()
            .once()
            .withf(|intent_id| intent_id == "pi_123")
            .return_once(move |_| {
                Ok(VerificationResult {
                    order,
                    created: true,
                    warnings: vec![PartialFailure {
                        step: FailureStep::ConfirmationEmail,
                        message: "provider down".to_string(),
                    }],
                })
            });

        let mut res = TestClient::get("http://example.com/checkout/verify?payment_intent_id=pi_123")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: VerificationResponse = res.take_json().await?;

        assert_eq!(body.order_uuid, order.into_uuid());
        assert!(body.created, "first verification creates the order");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_intent_id_returns_400() -> TestResult {
        let mut app = MockApp::default();

        app.checkout.expect_verify().never();

        let res = TestClient::get("http://example.com/checkout/verify")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unpaid_intent_returns_402() -> TestResult {
        let mut app = MockApp::default();

        app.checkout.expect_verify().once().return_once(|_| {
            Err(CheckoutError::from(PaymentProviderError::NotCompleted {
                status: "pending".to_string(),
            }))
        });

        let res = TestClient::get("http://example.com/checkout/verify?payment_intent_id=pi_1")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::PAYMENT_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_amount_mismatch_returns_500() -> TestResult {
        let mut app = MockApp::default();

        app.checkout.expect_verify().once().return_once(|_| {
            Err(CheckoutError::from(PersistenceError::AmountMismatch {
                intent_id: "pi_1".to_string(),
                recomputed: 10_100,
                pending: 10_100,
                confirmed: 9_000,
            }))
        });

        let res = TestClient::get("http://example.com/checkout/verify?payment_intent_id=pi_1")
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }

    #[test]
    fn outcomes_follow_results() {
        let existing = VerificationResult {
            order: OrderUuid::new(),
            created: false,
            warnings: Vec::new(),
        };

        assert_eq!(success_outcome(&existing), VerificationOutcome::Existing);
        assert_eq!(
            failure_outcome(&CheckoutError::from(PaymentProviderError::Timeout)),
            VerificationOutcome::Failed
        );
        assert_eq!(
            failure_outcome(&CheckoutError::from(PaymentProviderError::NotCompleted {
                status: "failed".to_string(),
            })),
            VerificationOutcome::Unpaid
        );
    }
}
