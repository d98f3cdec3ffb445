//! Get Inventory Record Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    admin::inventory::{errors::into_status_error, handlers::InventoryRecordResponse},
    extensions::*,
    state::State,
};

/// Get Inventory Record Handler
#[endpoint(
    tags("admin"),
    summary = "Get Inventory Record",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Stock record"),
        (status_code = StatusCode::NOT_FOUND, description = "Inventory record not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    perfume: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<InventoryRecordResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let record = state
        .app
        .inventory
        .get_record(perfume.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(record.into()))
}
