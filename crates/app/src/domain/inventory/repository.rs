//! Inventory Repository

use attar::{
    ids::{InventoryLogUuid, OrderUuid, PerfumeUuid},
    inventory::ChangeType,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::{
    database::{quantity_to_i32, try_get_quantity},
    domain::inventory::models::{InventoryLogEntry, InventoryRecord, NewInventoryLogEntry},
};

const ENSURE_INVENTORY_SQL: &str = include_str!("sql/ensure_inventory.sql");
const LOCK_INVENTORY_SQL: &str = include_str!("sql/lock_inventory.sql");
const UPDATE_STOCK_QUANTITY_SQL: &str = include_str!("sql/update_stock_quantity.sql");
const CREATE_INVENTORY_LOG_SQL: &str = include_str!("sql/create_inventory_log.sql");
const GET_INVENTORY_SQL: &str = include_str!("sql/get_inventory.sql");
const LIST_INVENTORY_LOGS_SQL: &str = include_str!("sql/list_inventory_logs.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgInventoryRepository;

impl PgInventoryRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock a perfume's stock row, creating it at zero if missing. Returns the
    /// current quantity.
    pub(crate) async fn lock_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfume: PerfumeUuid,
        low_stock_threshold: u32,
    ) -> Result<u32, sqlx::Error> {
        query(ENSURE_INVENTORY_SQL)
            .bind(perfume.into_uuid())
            .bind(quantity_to_i32(low_stock_threshold, "low_stock_threshold")?)
            .execute(&mut **tx)
            .await?;

        let row = query(LOCK_INVENTORY_SQL)
            .bind(perfume.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_get_quantity(&row, "stock_quantity")
    }

    pub(crate) async fn update_stock_quantity(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfume: PerfumeUuid,
        stock_quantity: u32,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_STOCK_QUANTITY_SQL)
            .bind(perfume.into_uuid())
            .bind(quantity_to_i32(stock_quantity, "stock_quantity")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn create_log_entry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        entry: &NewInventoryLogEntry,
    ) -> Result<InventoryLogEntry, sqlx::Error> {
        let quantity_change =
            i32::try_from(entry.change.quantity_change()).map_err(|e| sqlx::Error::ColumnDecode {
                index: "quantity_change".to_string(),
                source: Box::new(e),
            })?;

        query_as::<Postgres, InventoryLogEntry>(CREATE_INVENTORY_LOG_SQL)
            .bind(entry.uuid.into_uuid())
            .bind(entry.perfume.into_uuid())
            .bind(entry.change.change_type.as_str())
            .bind(quantity_to_i32(entry.change.quantity_before, "quantity_before")?)
            .bind(quantity_to_i32(entry.change.quantity_after, "quantity_after")?)
            .bind(quantity_change)
            .bind(&entry.reason)
            .bind(entry.order.map(OrderUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfume: PerfumeUuid,
    ) -> Result<InventoryRecord, sqlx::Error> {
        query_as::<Postgres, InventoryRecord>(GET_INVENTORY_SQL)
            .bind(perfume.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfume: PerfumeUuid,
    ) -> Result<Vec<InventoryLogEntry>, sqlx::Error> {
        query_as::<Postgres, InventoryLogEntry>(LIST_INVENTORY_LOGS_SQL)
            .bind(perfume.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            perfume: PerfumeUuid::from_uuid(row.try_get("perfume_uuid")?),
            stock_quantity: try_get_quantity(row, "stock_quantity")?,
            low_stock_threshold: try_get_quantity(row, "low_stock_threshold")?,
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for InventoryLogEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let change_type: String = row.try_get("change_type")?;

        let change_type = change_type
            .parse::<ChangeType>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "change_type".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: InventoryLogUuid::from_uuid(row.try_get("uuid")?),
            perfume: PerfumeUuid::from_uuid(row.try_get("perfume_uuid")?),
            change_type,
            quantity_before: try_get_quantity(row, "quantity_before")?,
            quantity_after: try_get_quantity(row, "quantity_after")?,
            quantity_change: i64::from(row.try_get::<i32, _>("quantity_change")?),
            reason: row.try_get("reason")?,
            order: row
                .try_get::<Option<Uuid>, _>("order_uuid")?
                .map(OrderUuid::from_uuid),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
