//! Update Order Status Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use attar::orders::OrderStatus;
use attar_app::{fulfilment::models::TransitionReport, partial_failure::PartialFailure};

use crate::{
    admin::{
        inventory::handlers::InventoryLogEntryResponse,
        orders::{errors::fulfilment_status_error, handlers::OrderResponse},
    },
    extensions::*,
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// One of processing, dispatched, delivered or returned
    pub status: String,
}

/// Update Order Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusResponse {
    pub order: OrderResponse,

    pub previous_status: String,

    pub current_status: String,

    /// Stock entries written because the order was delivered
    pub inventory_entries: Vec<InventoryLogEntryResponse>,

    /// Follow-up steps that failed after the status was saved
    pub warnings: Vec<WarningResponse>,
}

impl From<TransitionReport> for UpdateOrderStatusResponse {
    fn from(report: TransitionReport) -> Self {
        Self {
            order: report.order.into(),
            previous_status: report.previous.to_string(),
            current_status: report.current.to_string(),
            inventory_entries: report
                .inventory_entries
                .into_iter()
                .map(InventoryLogEntryResponse::from)
                .collect(),
            warnings: report.warnings.into_iter().map(WarningResponse::from).collect(),
        }
    }
}

/// Warning Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WarningResponse {
    pub step: String,

    pub message: String,
}

impl From<PartialFailure> for WarningResponse {
    fn from(failure: PartialFailure) -> Self {
        Self {
            step: failure.step.to_string(),
            message: failure.message,
        }
    }
}

/// Update Order Status Handler
///
/// Saves the new status, then runs its side effects. Entering `delivered`
/// deducts stock and emails the customer; entering `returned` appends a note.
/// A failed side effect is reported as a warning and does not undo the status.
#[endpoint(
    tags("admin"),
    summary = "Update Order Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<UpdateOrderStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = json
        .into_inner()
        .status
        .parse::<OrderStatus>()
        .or_400("Unknown order status")?;

    let report = state
        .app
        .fulfilment
        .transition(order.into_inner().into(), status)
        .await
        .map_err(fulfilment_status_error)?;

    if !report.warnings.is_empty() {
        info!(
            order_uuid = %report.order.uuid,
            warnings = report.warnings.len(),
            "order status updated with warnings"
        );
    }

    Ok(Json(report.into()))
}
