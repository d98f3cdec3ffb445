//! Adjust Stock Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    admin::inventory::{errors::into_status_error, handlers::InventoryLogEntryResponse},
    extensions::*,
    state::State,
};

/// Adjust Stock Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdjustStockRequest {
    /// New absolute stock quantity
    pub quantity: i64,

    /// Recorded in the audit log
    pub reason: String,
}

/// Adjust Stock Handler
///
/// Sets a perfume's stock to an absolute quantity and logs the change.
#[endpoint(
    tags("admin"),
    summary = "Adjust Stock",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Audit entry for the change"),
        (status_code = StatusCode::BAD_REQUEST, description = "Negative or out of range quantity"),
        (status_code = StatusCode::NOT_FOUND, description = "Perfume not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    perfume: PathParam<Uuid>,
    json: JsonBody<AdjustStockRequest>,
    depot: &mut Depot,
) -> Result<Json<InventoryLogEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let entry = state
        .app
        .inventory
        .adjust_stock(perfume.into_inner().into(), request.quantity, request.reason)
        .await
        .map_err(into_status_error)?;

    Ok(Json(entry.into()))
}
