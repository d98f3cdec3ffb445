//! Pending Checkout Models

use attar::{cart::CartLine, ids::OrderUuid, purchaser::Purchaser};
use jiff::Timestamp;

/// Pending Checkout Model
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCheckout {
    pub intent_id: String,
    pub purchaser: Purchaser,
    pub lines: Vec<CartLine>,
    pub delivery_address: String,
    pub amount: u64,
    pub currency: String,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub completed_order: Option<OrderUuid>,
}

impl PendingCheckout {
    #[must_use]
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }
}

/// New Pending Checkout Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewPendingCheckout {
    pub intent_id: String,
    pub purchaser: Purchaser,
    pub lines: Vec<CartLine>,
    pub delivery_address: String,
    pub amount: u64,
    pub currency: String,
    pub expires_at: Timestamp,
}
