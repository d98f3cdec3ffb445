//! Order Models

use attar::{
    cart::CartLine,
    ids::{OrderUuid, PerfumeUuid, UserUuid},
    orders::{OrderStatus, StatusTransition},
    purchaser::Purchaser,
};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub payment_intent_id: String,
    pub user: Option<UserUuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub status: OrderStatus,
    pub total: u64,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub delivery_email_sent: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub items: Vec<OrderItem>,
}

/// Price and quantity of a perfume at the time of purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub perfume: PerfumeUuid,
    pub quantity: u32,
    pub price: u64,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub payment_intent_id: String,
    pub purchaser: Purchaser,
    pub lines: Vec<CartLine>,
    pub total: u64,
    pub delivery_address: String,
}

/// Result of materializing an order for a payment intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderPlacement {
    /// This call created the order.
    Created(OrderUuid),

    /// An order already existed for the payment intent.
    Existing(OrderUuid),
}

impl OrderPlacement {
    #[must_use]
    pub const fn order(&self) -> OrderUuid {
        match self {
            Self::Created(order) | Self::Existing(order) => *order,
        }
    }

    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Order after a status write, with the status it replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub order: Order,
    pub transition: StatusTransition,
}
