//! Checkout models.

use attar::{
    cart::CartLine,
    ids::{OrderUuid, UserUuid},
    pricing::ShippingPolicy,
    purchaser::Purchaser,
};
use jiff::{SignedDuration, Timestamp};
use serde::Deserialize;

use crate::partial_failure::PartialFailure;

/// Webhook event announcing a payment status change.
pub const PAYMENT_STATUS_UPDATED_EVENT: &str = "payment_intent.status.updated";

/// Substituted by the payment provider with the intent id on redirect.
pub const INTENT_ID_PLACEHOLDER: &str = "{PAYMENT_INTENT_ID}";

/// How long a payment session stays open by default.
pub const DEFAULT_SESSION_TTL: SignedDuration = SignedDuration::from_mins(15);

#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub shipping: ShippingPolicy,
    pub session_ttl: SignedDuration,
    /// Base URL for the success, cancel and failure redirects.
    pub storefront_url: String,
    /// Create provider intents in test mode.
    pub test_mode: bool,
}

impl CheckoutConfig {
    #[must_use]
    pub fn new(storefront_url: impl Into<String>) -> Self {
        Self {
            shipping: ShippingPolicy::default(),
            session_ttl: DEFAULT_SESSION_TTL,
            storefront_url: storefront_url.into(),
            test_mode: false,
        }
    }

    /// Storefront page the provider sends the customer back to. Success and
    /// failure pages receive the intent id so they can call verify without
    /// any state kept in the browser.
    pub(crate) fn redirect_url(&self, outcome: RedirectOutcome) -> String {
        let base = self.storefront_url.trim_end_matches('/');
        let page = outcome.page();

        match outcome {
            RedirectOutcome::Cancel => format!("{base}/checkout/{page}"),
            RedirectOutcome::Success | RedirectOutcome::Failure => {
                format!("{base}/checkout/{page}?payment_intent_id={INTENT_ID_PLACEHOLDER}")
            }
        }
    }
}

/// Where the provider returns the customer after the hosted payment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RedirectOutcome {
    Success,
    Cancel,
    Failure,
}

impl RedirectOutcome {
    const fn page(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Cancel => "cancel",
            Self::Failure => "failure",
        }
    }
}

/// A request to start paying for a cart.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    /// Client-held lines. Only used for guests, and re-priced from the
    /// catalog.
    pub lines: Vec<CartLine>,

    /// Encoded delivery address, see [`attar::address`].
    pub delivery_address: String,

    pub is_guest: bool,

    /// User id asserted by a trusted caller.
    pub claimed_user: Option<UserUuid>,

    /// Raw `Authorization` header.
    pub authorization: Option<String>,
}

/// An open payment session at the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSession {
    pub intent_id: String,
    pub redirect_url: String,
    pub expires_at: Timestamp,
    /// Charged amount in minor units.
    pub amount: u64,
    pub currency: String,
    pub purchaser: Purchaser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub order: OrderUuid,

    /// Whether this verification created the order.
    pub created: bool,

    pub warnings: Vec<PartialFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookData {
    /// Payment intent id.
    pub id: String,

    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    Verified(VerificationResult),

    /// The event does not announce a completed payment.
    Ignored,
}
