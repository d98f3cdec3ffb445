//! Payment provider models.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Status reported for a paid intent.
pub const COMPLETED_STATUS: &str = "completed";

/// Parameters of a new payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentIntent {
    /// Amount in minor units.
    pub amount: u64,
    pub currency: String,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
    pub failure_url: String,
    pub expires_at: Timestamp,
    pub test: bool,
}

/// Payment intent as created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedPaymentIntent {
    pub id: String,
    pub redirect_url: String,
}

/// Payment intent as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    /// Amount in minor units.
    pub amount: u64,
    pub currency_code: String,
}

impl PaymentIntent {
    /// Only an exact `completed` status counts as paid.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == COMPLETED_STATUS
    }
}

/// Wire body of `POST /payment_intents`.
#[derive(Debug, Serialize)]
pub(crate) struct CreatePaymentIntentBody<'a> {
    pub(crate) amount: u64,
    pub(crate) currency_code: &'a str,
    pub(crate) message: &'a str,
    pub(crate) success_url: &'a str,
    pub(crate) cancel_url: &'a str,
    pub(crate) failure_url: &'a str,
    /// Unix epoch milliseconds.
    pub(crate) expiry: String,
    pub(crate) test: bool,
}

impl<'a> From<&'a NewPaymentIntent> for CreatePaymentIntentBody<'a> {
    fn from(intent: &'a NewPaymentIntent) -> Self {
        Self {
            amount: intent.amount,
            currency_code: &intent.currency,
            message: &intent.description,
            success_url: &intent.success_url,
            cancel_url: &intent.cancel_url,
            failure_url: &intent.failure_url,
            expiry: intent.expires_at.as_millisecond().to_string(),
            test: intent.test,
        }
    }
}
