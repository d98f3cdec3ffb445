//! Merge Cart Handler

use std::sync::Arc;

use salvo::{oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attar::cart::CartLine;

use crate::{
    cart::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Merge Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MergeCartRequest {
    /// Lines of the cart built before signing in
    pub items: Vec<MergeCartItemRequest>,
}

/// Merge Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MergeCartItemRequest {
    pub perfume: Uuid,

    pub quantity: u32,
}

/// Merge Cart Handler
///
/// Folds the cart built before signing in into the customer's cart. Each
/// line's quantity is capped at 10.
#[endpoint(
    tags("cart"),
    summary = "Merge Anonymous Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Merged cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Perfume not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<MergeCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity_or_401()?.id;

    // Prices are taken from the catalog when the cart is read.
    let lines = json
        .into_inner()
        .items
        .into_iter()
        .map(|item| CartLine::new(item.perfume.into(), item.quantity, 0))
        .collect();

    let cart = state
        .app
        .carts
        .merge(user, lines)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::priced(cart, &state.shipping)?))
}
