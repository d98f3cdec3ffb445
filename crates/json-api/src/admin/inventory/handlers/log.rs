//! Inventory Log Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    admin::inventory::{errors::into_status_error, handlers::InventoryLogEntryResponse},
    extensions::*,
    state::State,
};

/// Inventory Log Handler
///
/// Returns a perfume's stock audit log, newest first.
#[endpoint(
    tags("admin"),
    summary = "Get Inventory Log",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Audit log"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    perfume: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<Vec<InventoryLogEntryResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let entries = state
        .app
        .inventory
        .list_log(perfume.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(
        entries
            .into_iter()
            .map(InventoryLogEntryResponse::from)
            .collect(),
    ))
}
