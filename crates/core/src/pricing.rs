//! Pricing

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError, CartLine},
    money::{AmountError, money_minor_units, store_money},
};

/// Default flat shipping fee: AED 1.00.
pub const DEFAULT_FLAT_SHIPPING_FEE: u64 = 100;

/// Default total quantity from which shipping is waived.
pub const DEFAULT_FREE_SHIPPING_QUANTITY: u32 = 2;

/// Errors that can occur while pricing a set of lines.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Line arithmetic overflowed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The amount could not be represented as money.
    #[error(transparent)]
    Amount(#[from] AmountError),
}

/// Outcome of pricing a cart in the store currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingResult {
    pub subtotal: Money<'static, Currency>,
    pub shipping_cost: Money<'static, Currency>,
    pub total: Money<'static, Currency>,
    pub total_quantity: u32,
}

impl PricingResult {
    /// Grand total in minor units, as charged by the payment provider.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Amount`] if the total is negative.
    pub fn total_minor_units(&self) -> Result<u64, PricingError> {
        Ok(money_minor_units(&self.total)?)
    }

    /// Subtotal in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Amount`] if the subtotal is negative.
    pub fn subtotal_minor_units(&self) -> Result<u64, PricingError> {
        Ok(money_minor_units(&self.subtotal)?)
    }

    /// Shipping cost in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Amount`] if the shipping cost is negative.
    pub fn shipping_minor_units(&self) -> Result<u64, PricingError> {
        Ok(money_minor_units(&self.shipping_cost)?)
    }

    /// Whether the grand total equals the given minor-unit amount exactly.
    #[must_use]
    pub fn matches_amount(&self, amount_minor: u64) -> bool {
        self.total_minor_units()
            .is_ok_and(|total| total == amount_minor)
    }
}

/// Shipping rule applied at checkout.
///
/// A flat fee is charged on any non-empty order whose total quantity is below
/// `free_shipping_quantity`; larger orders ship free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Fee in minor units.
    pub flat_fee: u64,

    /// Total quantity from which shipping is free.
    pub free_shipping_quantity: u32,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_fee: DEFAULT_FLAT_SHIPPING_FEE,
            free_shipping_quantity: DEFAULT_FREE_SHIPPING_QUANTITY,
        }
    }
}

impl ShippingPolicy {
    /// Shipping fee for a given subtotal and total quantity.
    #[must_use]
    pub fn shipping_for(&self, subtotal: u64, total_quantity: u32) -> u64 {
        if subtotal > 0 && total_quantity < self.free_shipping_quantity {
            self.flat_fee
        } else {
            0
        }
    }

    /// Price a set of lines.
    ///
    /// # Errors
    ///
    /// - [`PricingError::Cart`]: line totals overflowed.
    /// - [`PricingError::Amount`]: the total does not fit the money type.
    pub fn price(&self, lines: &[CartLine]) -> Result<PricingResult, PricingError> {
        let mut subtotal = 0_u64;
        let mut total_quantity = 0_u32;

        for line in lines {
            let line_total = line.line_total().ok_or(CartError::Overflow)?;

            subtotal = subtotal
                .checked_add(line_total)
                .ok_or(CartError::Overflow)?;

            total_quantity = total_quantity.saturating_add(line.quantity);
        }

        let shipping = self.shipping_for(subtotal, total_quantity);
        let total = subtotal.checked_add(shipping).ok_or(CartError::Overflow)?;

        Ok(PricingResult {
            subtotal: store_money(subtotal)?,
            shipping_cost: store_money(shipping)?,
            total: store_money(total)?,
            total_quantity,
        })
    }

    /// Price every line of a cart.
    ///
    /// # Errors
    ///
    /// See [`ShippingPolicy::price`].
    pub fn price_cart(&self, cart: &Cart) -> Result<PricingResult, PricingError> {
        self.price(cart.lines())
    }
}
