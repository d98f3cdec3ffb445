//! Create Payment Session Handler

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, oapi::extract::JsonBody, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attar::{
    address::{ContactDetails, DeliveryAddress, encode_delivery_address},
    cart::CartLine,
};
use attar_app::checkout::models::{PaymentSession, SessionRequest};

use crate::{checkout::errors::into_status_error, extensions::*, state::State};

/// Create Payment Session Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateSessionRequest {
    /// Cart lines held by the client. Only used for guest checkouts; prices
    /// are always taken from the catalog.
    #[serde(default)]
    pub items: Vec<SessionItemRequest>,

    /// Delivery address already encoded with its contact segments
    #[serde(default)]
    pub delivery_address: Option<String>,

    /// Structured delivery address, encoded by the server
    #[serde(default)]
    pub address: Option<AddressRequest>,

    /// Contact details for the structured address
    #[serde(default)]
    pub contact: Option<ContactRequest>,

    /// Whether this is a guest checkout
    #[serde(default)]
    pub is_guest: bool,
}

/// Session Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SessionItemRequest {
    /// The perfume being bought
    pub perfume: Uuid,

    /// Units of the perfume, 1 to 10
    pub quantity: u32,

    /// Unit price the client displayed, in fils
    #[serde(default)]
    pub unit_price: u64,
}

impl From<SessionItemRequest> for CartLine {
    fn from(item: SessionItemRequest) -> Self {
        CartLine::new(item.perfume.into(), item.quantity, item.unit_price)
    }
}

/// Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressRequest {
    pub building: String,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
    pub area: String,
    #[serde(default)]
    pub landmark: Option<String>,
    pub emirate: String,
}

impl From<AddressRequest> for DeliveryAddress {
    fn from(request: AddressRequest) -> Self {
        DeliveryAddress {
            building: request.building,
            floor: request.floor,
            room: request.room,
            area: request.area,
            landmark: request.landmark,
            emirate: request.emirate,
        }
    }
}

/// Contact Request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<ContactRequest> for ContactDetails {
    fn from(request: ContactRequest) -> Self {
        ContactDetails {
            name: request.name,
            phone: request.phone,
            email: request.email,
        }
    }
}

impl CreateSessionRequest {
    fn into_session_request(self, authorization: Option<String>) -> SessionRequest {
        let delivery_address = match self.address {
            Some(address) => encode_delivery_address(
                &DeliveryAddress::from(address).to_line(),
                &self.contact.map(ContactDetails::from).unwrap_or_default(),
            ),
            None => self.delivery_address.unwrap_or_default(),
        };

        SessionRequest {
            lines: self.items.into_iter().map(CartLine::from).collect(),
            delivery_address,
            is_guest: self.is_guest,
            claimed_user: None,
            authorization,
        }
    }
}

/// Payment Session Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentSessionResponse {
    /// Payment intent id at the provider
    pub intent_id: String,

    /// Where to send the customer to pay
    pub redirect_url: String,

    /// When the session stops being verifiable
    pub expires_at: String,

    /// Charged amount in fils
    pub amount_minor: u64,

    /// ISO currency code
    pub currency: String,
}

impl From<PaymentSession> for PaymentSessionResponse {
    fn from(session: PaymentSession) -> Self {
        Self {
            intent_id: session.intent_id,
            redirect_url: session.redirect_url,
            expires_at: session.expires_at.to_string(),
            amount_minor: session.amount,
            currency: session.currency,
        }
    }
}

/// Create Payment Session Handler
///
/// Prices the cart, opens a payment intent and returns the provider redirect.
#[endpoint(
    tags("checkout"),
    summary = "Create Payment Session",
    responses(
        (status_code = StatusCode::CREATED, description = "Payment session created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Empty cart or missing address"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Registered checkout without a valid token"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Payment provider unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    json: JsonBody<CreateSessionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PaymentSessionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string);

    let session = state
        .app
        .checkout
        .create_session(json.into_inner().into_session_request(authorization))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(session.into()))
}

#[cfg(test)]
mod tests {
    use attar::{ids::UserUuid, purchaser::Purchaser};
    use attar_app::checkout::{CheckoutError, ValidationError};
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::{MockApp, public_service};

    use super::*;

    fn make_service(app: MockApp) -> Service {
        public_service(app, Router::with_path("checkout/sessions").post(handler))
    }

    fn session(amount: u64) -> PaymentSession {
        PaymentSession {
            intent_id: "pi_123".to_string(),
            redirect_url: "https://pay.example/pi_123".to_string(),
            expires_at: Timestamp::UNIX_EPOCH,
            amount,
            currency: "AED".to_string(),
            purchaser: Purchaser::registered(UserUuid::new()),
        }
    }

    #[tokio::test]
    async fn test_guest_session_returns_201() -> TestResult {
        let mut app = MockApp::default();
        let perfume = Uuid::now_v7();

        app.checkout
            .expect_create_session()
            .once()
            .withf(move |request| {
                request.is_guest
                    && request.authorization.is_none()
                    && request.claimed_user.is_none()
                    && request.lines.len() == 1
                    && request.lines.first().map(|line| line.perfume.into_uuid()) == Some(perfume)
                    && request.delivery_address == "Building X, Dubai | Contact: Jane"
            })
            .return_once(|_| Ok(session(10_100)));

        let mut res = TestClient::post("http://example.com/checkout/sessions")
            .json(&json!({
                "items": [{ "perfume": perfume, "quantity": 1, "unit_price": 100 }],
                "delivery_address": "Building X, Dubai | Contact: Jane",
                "is_guest": true,
            }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let body: PaymentSessionResponse = res.take_json().await?;

        assert_eq!(body.intent_id, "pi_123");
        assert_eq!(body.amount_minor, 10_100);

        Ok(())
    }

    #[tokio::test]
    async fn test_structured_address_is_encoded() -> TestResult {
        let mut app = MockApp::default();

        app.checkout
            .expect_create_session()
            .once()
            .withf(|request| {
                request.delivery_address
                    == "Tower 2, 14, Business Bay, Dubai | Contact: Omar | Phone: 0501234567"
            })
            .return_once(|_| Ok(session(500)));

        let res = TestClient::post("http://example.com/checkout/sessions")
            .json(&json!({
                "is_guest": true,
                "address": {
                    "building": "Tower 2",
                    "floor": "14",
                    "area": "Business Bay",
                    "emirate": "Dubai",
                },
                "contact": { "name": "Omar", "phone": "0501234567" },
            }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_authorization_is_forwarded_for_registered_checkout() -> TestResult {
        let mut app = MockApp::default();

        app.checkout
            .expect_create_session()
            .once()
            .withf(|request| {
                !request.is_guest && request.authorization.as_deref() == Some("Bearer tok")
            })
            .return_once(|_| Ok(session(500)));

        let res = TestClient::post("http://example.com/checkout/sessions")
            .add_header(AUTHORIZATION, "Bearer tok", true)
            .json(&json!({ "delivery_address": "Villa 1, Dubai" }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_returns_400() -> TestResult {
        let mut app = MockApp::default();

        app.checkout
            .expect_create_session()
            .once()
            .return_once(|_| Err(CheckoutError::from(ValidationError::EmptyCart)));

        let res = TestClient::post("http://example.com/checkout/sessions")
            .json(&json!({ "is_guest": true, "delivery_address": "Villa 1, Dubai" }))
            .send(&make_service(app))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
