//! Inventory Models

use attar::{
    ids::{InventoryLogUuid, OrderUuid, PerfumeUuid},
    inventory::{ChangeType, StockChange, StockLevel},
};
use jiff::Timestamp;

/// Inventory Record Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub perfume: PerfumeUuid,
    pub stock_quantity: u32,
    pub low_stock_threshold: u32,
    pub updated_at: Timestamp,
}

impl InventoryRecord {
    #[must_use]
    pub const fn level(&self) -> StockLevel {
        StockLevel::of(self.stock_quantity, self.low_stock_threshold)
    }
}

/// Inventory Log Entry Model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLogEntry {
    pub uuid: InventoryLogUuid,
    pub perfume: PerfumeUuid,
    pub change_type: ChangeType,
    pub quantity_before: u32,
    pub quantity_after: u32,
    pub quantity_change: i64,
    pub reason: String,
    pub order: Option<OrderUuid>,
    pub created_at: Timestamp,
}

/// Log entry about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NewInventoryLogEntry {
    pub(crate) uuid: InventoryLogUuid,
    pub(crate) perfume: PerfumeUuid,
    pub(crate) change: StockChange,
    pub(crate) reason: String,
    pub(crate) order: Option<OrderUuid>,
}

/// Units of a perfume handed over with a delivered order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveredLine {
    pub perfume: PerfumeUuid,
    pub quantity: u32,
}
