//! Cart Handlers

use salvo::{http::StatusError, oapi::ToSchema};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attar::pricing::ShippingPolicy;
use attar_app::domain::carts::models::{CartItem, UserCart};

use crate::extensions::*;

pub(crate) mod get;
pub(crate) mod merge;
pub(crate) mod remove_item;
pub(crate) mod set_item;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The items in the cart, one per perfume
    pub items: Vec<CartItemResponse>,

    /// Sum of the line totals, in fils
    pub subtotal: u64,

    /// Shipping the cart would be charged at checkout, in fils
    pub shipping_cost: u64,

    /// Subtotal plus shipping, in fils
    pub total: u64,

    /// Units across every line
    pub total_quantity: u32,
}

impl CartResponse {
    /// Price the cart with the store's shipping rule.
    pub(crate) fn priced(cart: UserCart, shipping: &ShippingPolicy) -> Result<Self, StatusError> {
        let pricing = shipping
            .price_cart(&cart.to_cart())
            .or_500("failed to price cart")?;

        let subtotal = pricing.subtotal_minor_units().or_500("failed to price cart")?;
        let shipping_cost = pricing.shipping_minor_units().or_500("failed to price cart")?;
        let total = pricing.total_minor_units().or_500("failed to price cart")?;

        Ok(Self {
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            subtotal,
            shipping_cost,
            total,
            total_quantity: pricing.total_quantity,
        })
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The perfume in this line
    pub perfume_uuid: Uuid,

    pub name: String,

    pub brand: String,

    /// Current catalog price, in fils
    pub unit_price: u64,

    pub quantity: u32,
}

impl From<CartItem> for CartItemResponse {
    fn from(item: CartItem) -> Self {
        Self {
            perfume_uuid: item.perfume.into_uuid(),
            name: item.name,
            brand: item.brand,
            unit_price: item.unit_price,
            quantity: item.quantity,
        }
    }
}
