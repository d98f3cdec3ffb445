//! Inventory
//!
//! Stock arithmetic shared by order delivery and admin adjustments. Storage
//! applies a [`StockChange`] and appends it to the audit log in the same
//! transaction.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::OrderUuid;

/// Threshold used when a record is created without one.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Errors raised while planning a stock change.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// The requested quantity would leave negative stock.
    #[error("stock quantity cannot be negative (got {0})")]
    NegativeQuantity(i64),

    /// The requested quantity does not fit the stock counter.
    #[error("stock quantity {0} is out of range")]
    OutOfRange(i64),
}

/// Why a stock quantity changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    ManualAdjustment,
    OrderDelivery,
    StockAddition,
    ReturnProcessing,
}

impl ChangeType {
    const ALL: [Self; 4] = [
        Self::ManualAdjustment,
        Self::OrderDelivery,
        Self::StockAddition,
        Self::ReturnProcessing,
    ];

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ManualAdjustment => "manual_adjustment",
            Self::OrderDelivery => "order_delivery",
            Self::StockAddition => "stock_addition",
            Self::ReturnProcessing => "return_processing",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognised change type string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown inventory change type: {0}")]
pub struct UnknownChangeType(pub String);

impl FromStr for ChangeType {
    type Err = UnknownChangeType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|change_type| change_type.as_str() == value)
            .ok_or_else(|| UnknownChangeType(value.to_string()))
    }
}

/// Availability derived from the stock quantity. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockLevel {
    /// Classify a quantity against a low-stock threshold.
    #[must_use]
    pub const fn of(quantity: u32, low_stock_threshold: u32) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity <= low_stock_threshold {
            Self::LowStock
        } else {
            Self::InStock
        }
    }
}

/// A planned change to one perfume's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub change_type: ChangeType,
    pub quantity_before: u32,
    pub quantity_after: u32,
}

impl StockChange {
    /// Deduct delivered units, flooring the stock at zero.
    #[must_use]
    pub const fn delivery(quantity_before: u32, delivered: u32) -> Self {
        Self {
            change_type: ChangeType::OrderDelivery,
            quantity_before,
            quantity_after: quantity_before.saturating_sub(delivered),
        }
    }

    /// Set the stock to an absolute quantity.
    ///
    /// # Errors
    ///
    /// - [`InventoryError::NegativeQuantity`]: `new_quantity` is below zero.
    /// - [`InventoryError::OutOfRange`]: `new_quantity` exceeds the counter.
    pub fn manual(quantity_before: u32, new_quantity: i64) -> Result<Self, InventoryError> {
        if new_quantity < 0 {
            return Err(InventoryError::NegativeQuantity(new_quantity));
        }

        let quantity_after = u32::try_from(new_quantity)
            .map_err(|_error| InventoryError::OutOfRange(new_quantity))?;

        Ok(Self {
            change_type: ChangeType::ManualAdjustment,
            quantity_before,
            quantity_after,
        })
    }

    /// Add received units.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::OutOfRange`] if the stock would overflow.
    pub fn addition(quantity_before: u32, added: u32) -> Result<Self, InventoryError> {
        let quantity_after = quantity_before
            .checked_add(added)
            .ok_or_else(|| InventoryError::OutOfRange(i64::from(quantity_before) + i64::from(added)))?;

        Ok(Self {
            change_type: ChangeType::StockAddition,
            quantity_before,
            quantity_after,
        })
    }

    /// Signed difference actually applied.
    #[must_use]
    pub fn quantity_change(&self) -> i64 {
        i64::from(self.quantity_after) - i64::from(self.quantity_before)
    }

    /// Whether applying this change leaves stock untouched.
    #[must_use]
    pub const fn is_zero_effect(&self) -> bool {
        self.quantity_before == self.quantity_after
    }
}

/// Audit reason recorded for stock deducted by a delivered order.
#[must_use]
pub fn delivery_reason(order: OrderUuid) -> String {
    format!("Order {order} delivered")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn delivery_decrements_stock() {
        let change = StockChange::delivery(5, 2);

        assert_eq!(change.quantity_after, 3);
        assert_eq!(change.quantity_change(), -2);
        assert_eq!(change.change_type, ChangeType::OrderDelivery);
    }

    #[test]
    fn delivery_floors_at_zero_and_logs_actual_delta() {
        let change = StockChange::delivery(1, 3);

        assert_eq!(change.quantity_after, 0);
        assert_eq!(change.quantity_change(), -1);
    }

    #[test]
    fn delivery_from_empty_stock_is_zero_effect() {
        let change = StockChange::delivery(0, 4);

        assert!(change.is_zero_effect());
        assert_eq!(change.quantity_change(), 0);
    }

    #[test]
    fn floor_holds_for_every_combination() {
        for before in 0..=12 {
            for delivered in 0..=12 {
                let change = StockChange::delivery(before, delivered);
                let expected = i64::from(before.min(delivered));

                assert_eq!(change.quantity_after, before.saturating_sub(delivered));
                assert_eq!(change.quantity_change(), -expected);
            }
        }
    }

    #[test]
    fn manual_adjustment_rejects_negative_quantities() {
        assert_eq!(
            StockChange::manual(4, -1),
            Err(InventoryError::NegativeQuantity(-1))
        );
    }

    #[test]
    fn manual_adjustment_logs_delta() -> TestResult {
        let change = StockChange::manual(4, 10)?;

        assert_eq!(change.quantity_change(), 6);
        assert_eq!(change.change_type, ChangeType::ManualAdjustment);

        Ok(())
    }

    #[test]
    fn addition_overflow_is_rejected() {
        assert!(matches!(
            StockChange::addition(u32::MAX, 1),
            Err(InventoryError::OutOfRange(_))
        ));
    }

    #[test]
    fn stock_levels_follow_quantity() {
        assert_eq!(StockLevel::of(0, 5), StockLevel::OutOfStock);
        assert_eq!(StockLevel::of(5, 5), StockLevel::LowStock);
        assert_eq!(StockLevel::of(6, 5), StockLevel::InStock);
        assert_eq!(StockLevel::of(1, 0), StockLevel::InStock);
    }

    #[test]
    fn change_types_round_trip_through_strings() -> TestResult {
        for change_type in ChangeType::ALL {
            assert_eq!(change_type.as_str().parse::<ChangeType>()?, change_type);
        }

        Ok(())
    }

    #[test]
    fn delivery_reason_references_order() {
        let order = OrderUuid::new();

        assert_eq!(delivery_reason(order), format!("Order {order} delivered"));
    }
}
