//! Payment Webhook Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};

use attar_app::checkout::models::{WebhookData, WebhookEvent, WebhookOutcome};

use crate::{
    checkout::{
        errors::into_status_error,
        handlers::verify::{failure_outcome, success_outcome},
    },
    extensions::*,
    observability::observe_verification,
    state::State,
};

/// Payment Webhook Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookRequest {
    /// Event name, e.g. `payment_intent.status.updated`
    pub event: String,

    pub data: WebhookDataRequest,
}

/// Payment Webhook Data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookDataRequest {
    /// Payment intent id
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

impl From<WebhookRequest> for WebhookEvent {
    fn from(request: WebhookRequest) -> Self {
        WebhookEvent {
            event: request.event,
            data: WebhookData {
                id: request.data.id,
                status: request.data.status,
            },
        }
    }
}

/// Payment Webhook Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookResponse {
    /// Whether the event led to a verification
    pub handled: bool,
}

/// Payment Webhook Handler
///
/// Completed payments are verified exactly as on the redirect back; every
/// other event is acknowledged and ignored.
#[endpoint(
    tags("checkout"),
    summary = "Payment Provider Webhook",
    responses(
        (status_code = StatusCode::OK, description = "Event acknowledged"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Payment needs manual reconciliation"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<WebhookRequest>,
    depot: &mut Depot,
) -> Result<Json<WebhookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let outcome = state
        .app
        .checkout
        .handle_webhook(json.into_inner().into())
        .await;

    let handled = match outcome {
        Ok(WebhookOutcome::Verified(result)) => {
            observe_verification(success_outcome(&result));

            true
        }
        Ok(WebhookOutcome::Ignored) => false,
        Err(error) => {
            observe_verification(failure_outcome(&error));

            return Err(into_status_error(error));
        }
    };

    Ok(Json(WebhookResponse { handled }))
}
