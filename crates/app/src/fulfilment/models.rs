//! Fulfilment models.

use attar::orders::OrderStatus;

use crate::{
    domain::{inventory::models::InventoryLogEntry, orders::models::Order},
    partial_failure::PartialFailure,
};

/// Outcome of an admin status change.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionReport {
    /// The order after the change and its side effects.
    pub order: Order,
    pub previous: OrderStatus,
    pub current: OrderStatus,
    /// Audit entries written by the stock decrement, if any.
    pub inventory_entries: Vec<InventoryLogEntry>,
    pub warnings: Vec<PartialFailure>,
}
