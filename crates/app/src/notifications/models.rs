//! Notification models.

use std::fmt;

use attar::ids::OrderUuid;
use serde::{Deserialize, Serialize};

use crate::domain::{orders::models::Order, payments::models::ProductDetail};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent once when a paid order is first created.
    Confirmation,

    /// Sent once when an order first enters `delivered`.
    Delivery,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Confirmation => "confirmation",
            Self::Delivery => "delivery",
        })
    }
}

/// An email about one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub order: OrderUuid,
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub lines: Vec<ProductDetail>,
    /// Grand total in minor units, shipping included.
    pub total: u64,
    pub delivery_address: String,
}

impl Notification {
    /// Confirmation email for a paid order.
    #[must_use]
    pub fn confirmation(
        order: OrderUuid,
        recipient_email: String,
        recipient_name: Option<String>,
        lines: Vec<ProductDetail>,
        total: u64,
        delivery_address: String,
    ) -> Self {
        Self {
            kind: NotificationKind::Confirmation,
            order,
            recipient_email,
            recipient_name,
            lines,
            total,
            delivery_address,
        }
    }

    /// Delivery email for an order.
    #[must_use]
    pub fn delivery(
        order: &Order,
        recipient_email: String,
        recipient_name: Option<String>,
        lines: Vec<ProductDetail>,
    ) -> Self {
        Self {
            kind: NotificationKind::Delivery,
            order: order.uuid,
            recipient_email,
            recipient_name,
            lines,
            total: order.total,
            delivery_address: order.delivery_address.clone(),
        }
    }
}

/// Wire body of `POST /emails`.
#[derive(Debug, Serialize)]
pub(crate) struct SendEmailBody<'a> {
    pub(crate) from: &'a str,
    pub(crate) to: [&'a str; 1],
    pub(crate) subject: &'a str,
    pub(crate) html: &'a str,
}

/// Wire response of `POST /emails`.
#[derive(Debug, Deserialize)]
pub(crate) struct SentEmailBody {
    pub(crate) id: String,
}
