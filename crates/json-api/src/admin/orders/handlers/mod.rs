//! Admin Order Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attar_app::domain::orders::models::{Order, OrderItem};

pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod update_status;

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Payment intent the order was materialized from
    pub payment_intent_id: String,

    /// Registered purchaser, absent for guest orders
    pub user_uuid: Option<Uuid>,

    pub guest_name: Option<String>,

    pub guest_email: Option<String>,

    pub guest_phone: Option<String>,

    /// One of processing, dispatched, delivered or returned
    pub status: String,

    /// Charged total in fils, shipping included
    pub total: u64,

    pub delivery_address: String,

    pub notes: Option<String>,

    pub delivery_email_sent: bool,

    pub created_at: String,

    pub updated_at: String,

    pub items: Vec<OrderItemResponse>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            payment_intent_id: order.payment_intent_id,
            user_uuid: order.user.map(|user| user.into_uuid()),
            guest_name: order.guest_name,
            guest_email: order.guest_email,
            guest_phone: order.guest_phone,
            status: order.status.to_string(),
            total: order.total,
            delivery_address: order.delivery_address,
            notes: order.notes,
            delivery_email_sent: order.delivery_email_sent,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            items: order.items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub perfume_uuid: Uuid,

    pub quantity: u32,

    /// Unit price at the time of purchase, in fils
    pub price: u64,
}

impl From<OrderItem> for OrderItemResponse {
    fn from(item: OrderItem) -> Self {
        Self {
            perfume_uuid: item.perfume.into_uuid(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}
