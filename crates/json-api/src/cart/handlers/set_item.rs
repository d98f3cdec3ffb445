//! Set Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    cart::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Set Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetCartItemRequest {
    /// Absolute quantity, 1 to 10
    pub quantity: u32,
}

/// Set Cart Item Handler
///
/// Sets the quantity of a perfume, adding it to the cart if absent.
#[endpoint(
    tags("cart"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Updated cart"),
        (status_code = StatusCode::BAD_REQUEST, description = "Quantity out of range"),
        (status_code = StatusCode::NOT_FOUND, description = "Perfume not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    perfume: PathParam<Uuid>,
    json: JsonBody<SetCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.identity_or_401()?.id;

    let cart = state
        .app
        .carts
        .set_item(user, perfume.into_inner().into(), json.into_inner().quantity)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::priced(cart, &state.shipping)?))
}

#[cfg(test)]
mod tests {
    use attar::{cart::CartError, ids::PerfumeUuid};
    use attar_app::domain::carts::CartsServiceError;
    use salvo::test::TestClient;
    use serde_json::json;
    use testresult::TestResult;

    use crate::{
        cart::handlers::tests::make_cart,
        test_helpers::{MockApp, TEST_USER_UUID, customer_service},
    };

    use super::*;

    fn make_service(app: MockApp) -> Service {
        customer_service(app, Router::with_path("cart/items/{perfume}").put(handler))
    }

    #[tokio::test]
    async fn test_set_item_returns_updated_cart() -> TestResult {
        let mut app = MockApp::default();
        let perfume = PerfumeUuid::new();
        let cart = make_cart(&[(perfume, 3)]);

        app.carts
            .expect_set_item()
            .once()
            .withf(move |user, p, quantity| *user == TEST_USER_UUID && *p == perfume && *quantity == 3)
            .return_once(move |_, _, _| Ok(cart));

        let res = TestClient::put(format!("http://example.com/cart/items/{perfume}"))
            .json(&json!({ "quantity": 3 }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_quantity_out_of_range_returns_400() -> TestResult {
        let mut app = MockApp::default();
        let perfume = PerfumeUuid::new();

        app.carts
            .expect_set_item()
            .once()
            .return_once(|_, _, quantity| {
                Err(CartsServiceError::Cart(CartError::QuantityOutOfRange(quantity)))
            });

        let res = TestClient::put(format!("http://example.com/cart/items/{perfume}"))
            .json(&json!({ "quantity": 11 }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_perfume_returns_404() -> TestResult {
        let mut app = MockApp::default();
        let perfume = PerfumeUuid::new();

        app.carts
            .expect_set_item()
            .once()
            .return_once(|_, _, _| Err(CartsServiceError::InvalidReference));

        let res = TestClient::put(format!("http://example.com/cart/items/{perfume}"))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
