//! Inventory service.

use async_trait::async_trait;
use attar::{
    ids::{InventoryLogUuid, OrderUuid, PerfumeUuid},
    inventory::{DEFAULT_LOW_STOCK_THRESHOLD, StockChange, delivery_reason},
};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::inventory::{
        errors::InventoryServiceError,
        models::{DeliveredLine, InventoryLogEntry, InventoryRecord, NewInventoryLogEntry},
        repository::PgInventoryRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgInventoryService {
    db: Db,
    repository: PgInventoryRepository,
}

impl PgInventoryService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgInventoryRepository::new(),
        }
    }

    async fn apply(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfume: PerfumeUuid,
        change: StockChange,
        reason: String,
        order: Option<OrderUuid>,
    ) -> Result<InventoryLogEntry, InventoryServiceError> {
        self.repository
            .update_stock_quantity(tx, perfume, change.quantity_after)
            .await?;

        let entry = self
            .repository
            .create_log_entry(
                tx,
                &NewInventoryLogEntry {
                    uuid: InventoryLogUuid::new(),
                    perfume,
                    change,
                    reason,
                    order,
                },
            )
            .await?;

        Ok(entry)
    }
}

#[async_trait]
impl InventoryService for PgInventoryService {
    async fn apply_order_delivery(
        &self,
        order: OrderUuid,
        lines: Vec<DeliveredLine>,
    ) -> Result<Vec<InventoryLogEntry>, InventoryServiceError> {
        let mut tx = self.db.begin().await?;
        let mut entries = Vec::with_capacity(lines.len());

        for line in lines {
            let before = self
                .repository
                .lock_stock(&mut tx, line.perfume, DEFAULT_LOW_STOCK_THRESHOLD)
                .await?;

            let change = StockChange::delivery(before, line.quantity);

            let entry = self
                .apply(
                    &mut tx,
                    line.perfume,
                    change,
                    delivery_reason(order),
                    Some(order),
                )
                .await?;

            entries.push(entry);
        }

        tx.commit().await?;

        info!(order_uuid = %order, lines = entries.len(), "deducted delivered stock");

        Ok(entries)
    }

    async fn adjust_stock(
        &self,
        perfume: PerfumeUuid,
        new_quantity: i64,
        reason: String,
    ) -> Result<InventoryLogEntry, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let before = self
            .repository
            .lock_stock(&mut tx, perfume, DEFAULT_LOW_STOCK_THRESHOLD)
            .await?;

        let change = StockChange::manual(before, new_quantity)?;

        let entry = self.apply(&mut tx, perfume, change, reason, None).await?;

        tx.commit().await?;

        Ok(entry)
    }

    async fn add_stock(
        &self,
        perfume: PerfumeUuid,
        quantity: u32,
        reason: String,
    ) -> Result<InventoryLogEntry, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let before = self
            .repository
            .lock_stock(&mut tx, perfume, DEFAULT_LOW_STOCK_THRESHOLD)
            .await?;

        let change = StockChange::addition(before, quantity)?;

        let entry = self.apply(&mut tx, perfume, change, reason, None).await?;

        tx.commit().await?;

        Ok(entry)
    }

    async fn get_record(
        &self,
        perfume: PerfumeUuid,
    ) -> Result<InventoryRecord, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.repository.get_record(&mut tx, perfume).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_log(
        &self,
        perfume: PerfumeUuid,
    ) -> Result<Vec<InventoryLogEntry>, InventoryServiceError> {
        let mut tx = self.db.begin().await?;

        let entries = self.repository.list_log(&mut tx, perfume).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Deduct the units of a delivered order, floored at zero, in one
    /// transaction. Perfumes without a stock record get one at zero.
    async fn apply_order_delivery(
        &self,
        order: OrderUuid,
        lines: Vec<DeliveredLine>,
    ) -> Result<Vec<InventoryLogEntry>, InventoryServiceError>;

    /// Set the stock to an absolute quantity.
    async fn adjust_stock(
        &self,
        perfume: PerfumeUuid,
        new_quantity: i64,
        reason: String,
    ) -> Result<InventoryLogEntry, InventoryServiceError>;

    /// Add received units to the stock.
    async fn add_stock(
        &self,
        perfume: PerfumeUuid,
        quantity: u32,
        reason: String,
    ) -> Result<InventoryLogEntry, InventoryServiceError>;

    /// Retrieve a perfume's stock record.
    async fn get_record(
        &self,
        perfume: PerfumeUuid,
    ) -> Result<InventoryRecord, InventoryServiceError>;

    /// Retrieve a perfume's audit log, newest first.
    async fn list_log(
        &self,
        perfume: PerfumeUuid,
    ) -> Result<Vec<InventoryLogEntry>, InventoryServiceError>;
}

#[cfg(test)]
mod tests {
    use attar::{
        cart::CartLine,
        inventory::{ChangeType, StockLevel},
        purchaser::Purchaser,
    };
    use testresult::TestResult;

    use crate::{
        domain::orders::{OrdersService, models::NewOrder},
        test::TestContext,
    };

    use super::*;

    async fn place_order(ctx: &TestContext, perfume: PerfumeUuid, quantity: u32) -> OrderUuid {
        let uuid = OrderUuid::new();

        ctx.orders
            .create_order_with_items(NewOrder {
                uuid,
                payment_intent_id: format!("pi_{uuid}"),
                purchaser: Purchaser::guest_from_address("Flat 2, Deira, Dubai"),
                lines: vec![CartLine::new(perfume, quantity, 100_00)],
                total: 100_00 * u64::from(quantity),
                delivery_address: "Flat 2, Deira, Dubai".to_string(),
            })
            .await
            .expect("order should be created");

        uuid
    }

    #[tokio::test]
    async fn delivery_without_a_stock_record_creates_one_at_zero() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Saffron", 100_00).await;
        let order = place_order(&ctx, perfume, 2).await;

        let entries = ctx
            .inventory
            .apply_order_delivery(order, vec![DeliveredLine { perfume, quantity: 2 }])
            .await?;

        let entry = entries.first().ok_or("missing log entry")?;

        assert_eq!(entry.change_type, ChangeType::OrderDelivery);
        assert_eq!(entry.quantity_before, 0);
        assert_eq!(entry.quantity_after, 0);
        assert_eq!(entry.quantity_change, 0);
        assert_eq!(entry.order, Some(order));

        let record = ctx.inventory.get_record(perfume).await?;

        assert_eq!(record.stock_quantity, 0);
        assert_eq!(record.low_stock_threshold, DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(record.level(), StockLevel::OutOfStock);

        Ok(())
    }

    #[tokio::test]
    async fn delivery_floors_stock_at_zero_and_logs_the_applied_delta() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Jasmine", 100_00).await;

        ctx.inventory
            .add_stock(perfume, 1, "Initial delivery".to_string())
            .await?;

        let order = place_order(&ctx, perfume, 3).await;

        let entries = ctx
            .inventory
            .apply_order_delivery(order, vec![DeliveredLine { perfume, quantity: 3 }])
            .await?;

        let entry = entries.first().ok_or("missing log entry")?;

        assert_eq!(entry.quantity_before, 1);
        assert_eq!(entry.quantity_after, 0);
        assert_eq!(entry.quantity_change, -1);
        assert_eq!(entry.reason, delivery_reason(order));
        assert_eq!(ctx.inventory.get_record(perfume).await?.stock_quantity, 0);

        Ok(())
    }

    #[tokio::test]
    async fn failed_line_rolls_back_the_whole_delivery() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Cedar", 100_00).await;

        ctx.inventory
            .add_stock(perfume, 5, "Initial delivery".to_string())
            .await?;

        let order = place_order(&ctx, perfume, 1).await;

        let result = ctx
            .inventory
            .apply_order_delivery(
                order,
                vec![
                    DeliveredLine { perfume, quantity: 1 },
                    DeliveredLine {
                        perfume: PerfumeUuid::new(),
                        quantity: 1,
                    },
                ],
            )
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
        assert_eq!(ctx.inventory.get_record(perfume).await?.stock_quantity, 5);
        assert_eq!(ctx.inventory.list_log(perfume).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn manual_adjustment_sets_stock_and_is_logged_newest_first() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Sandalwood", 100_00).await;

        ctx.inventory
            .add_stock(perfume, 4, "Restock".to_string())
            .await?;

        let adjusted = ctx
            .inventory
            .adjust_stock(perfume, 10, "Stocktake".to_string())
            .await?;

        assert_eq!(adjusted.change_type, ChangeType::ManualAdjustment);
        assert_eq!(adjusted.quantity_change, 6);

        let log = ctx.inventory.list_log(perfume).await?;

        assert_eq!(
            log.iter().map(|entry| entry.change_type).collect::<Vec<_>>(),
            [ChangeType::ManualAdjustment, ChangeType::StockAddition]
        );

        Ok(())
    }

    #[tokio::test]
    async fn negative_adjustment_is_rejected_without_a_log_entry() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Neroli", 100_00).await;

        let result = ctx
            .inventory
            .adjust_stock(perfume, -3, "Typo".to_string())
            .await;

        assert!(
            matches!(result, Err(InventoryServiceError::NegativeQuantity(-3))),
            "expected NegativeQuantity, got {result:?}"
        );
        assert!(ctx.inventory.list_log(perfume).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn record_for_untracked_perfume_is_not_found() {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Iris", 100_00).await;

        let result = ctx.inventory.get_record(perfume).await;

        assert!(
            matches!(result, Err(InventoryServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
