//! Payment Record Models

use attar::ids::{OrderUuid, PerfumeUuid};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A purchased line as shown to the customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetail {
    pub perfume: PerfumeUuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: u64,
}

impl ProductDetail {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        self.unit_price.saturating_mul(u64::from(self.quantity))
    }
}

/// Successful Payment Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessfulPayment {
    pub payment_id: String,
    pub order: OrderUuid,
    pub amount: u64,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub delivery_address: String,
    pub product_details: Vec<ProductDetail>,
    pub email_sent: bool,
    pub created_at: Timestamp,
}

/// New Successful Payment Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuccessfulPayment {
    pub payment_id: String,
    pub order: OrderUuid,
    pub amount: u64,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub delivery_address: String,
    pub product_details: Vec<ProductDetail>,
}

impl NewSuccessfulPayment {
    /// The record as stored, before any email has gone out.
    #[must_use]
    pub fn into_recorded(self, created_at: Timestamp) -> SuccessfulPayment {
        SuccessfulPayment {
            payment_id: self.payment_id,
            order: self.order,
            amount: self.amount,
            customer_email: self.customer_email,
            customer_name: self.customer_name,
            delivery_address: self.delivery_address,
            product_details: self.product_details,
            email_sent: false,
            created_at,
        }
    }
}
