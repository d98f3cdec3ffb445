//! Admin Inventory Handlers

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use attar::inventory::StockLevel;
use attar_app::domain::inventory::models::{InventoryLogEntry, InventoryRecord};

pub(crate) mod add_stock;
pub(crate) mod adjust;
pub(crate) mod get;
pub(crate) mod log;

/// Inventory Record Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InventoryRecordResponse {
    pub perfume_uuid: Uuid,

    pub stock_quantity: u32,

    pub low_stock_threshold: u32,

    /// One of in_stock, low_stock or out_of_stock
    pub level: String,

    pub updated_at: String,
}

impl From<InventoryRecord> for InventoryRecordResponse {
    fn from(record: InventoryRecord) -> Self {
        let level = match record.level() {
            StockLevel::InStock => "in_stock",
            StockLevel::LowStock => "low_stock",
            StockLevel::OutOfStock => "out_of_stock",
        };

        Self {
            perfume_uuid: record.perfume.into_uuid(),
            stock_quantity: record.stock_quantity,
            low_stock_threshold: record.low_stock_threshold,
            level: level.to_string(),
            updated_at: record.updated_at.to_string(),
        }
    }
}

/// Inventory Log Entry Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InventoryLogEntryResponse {
    pub uuid: Uuid,

    pub perfume_uuid: Uuid,

    pub change_type: String,

    pub quantity_before: u32,

    pub quantity_after: u32,

    /// Difference actually applied, negative for deductions
    pub quantity_change: i64,

    pub reason: String,

    /// Order that caused the change, for deliveries
    pub order_uuid: Option<Uuid>,

    pub created_at: String,
}

impl From<InventoryLogEntry> for InventoryLogEntryResponse {
    fn from(entry: InventoryLogEntry) -> Self {
        Self {
            uuid: entry.uuid.into_uuid(),
            perfume_uuid: entry.perfume.into_uuid(),
            change_type: entry.change_type.to_string(),
            quantity_before: entry.quantity_before,
            quantity_after: entry.quantity_after,
            quantity_change: entry.quantity_change,
            reason: entry.reason,
            order_uuid: entry.order.map(|order| order.into_uuid()),
            created_at: entry.created_at.to_string(),
        }
    }
}
