//! Add Stock Handler

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

/// Add Stock Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddStockRequest {
    /// Units received
    pub quantity: u32,

    /// Recorded in the audit log
    pub reason: String,
}

/// Add Stock Handler
#[endpoint(
    tags("admin"),
    summary = "Add Stock",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Audit entry for the addition"),
        (status_code = StatusCode::BAD_REQUEST, description = "Stock would overflow"),
        (status_code = StatusCode::NOT_FOUND, description = "Perfume not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    perfume: PathParam<Uuid>,
    json: JsonBody<AddStockRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<InventoryLogEntryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let entry = state
        .app
        .inventory
        .add_stock(perfume.into_inner().into(), request.quantity, request.reason)
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(entry.into()))
}
