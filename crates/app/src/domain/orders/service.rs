//! Orders service.

use async_trait::async_trait;
use attar::{
    ids::OrderUuid,
    orders::{OrderStatus, StatusTransition, append_note},
};
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::orders::{
        errors::{OrdersServiceError, is_duplicate_payment_intent},
        models::{NewOrder, Order, OrderPlacement, StatusChange},
        repository::PgOrdersRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order_with_items(
        &self,
        order: NewOrder,
    ) -> Result<OrderPlacement, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        match self.repository.create_order_with_items(&mut tx, &order).await {
            Ok(created) => {
                tx.commit().await?;

                Ok(OrderPlacement::Created(created))
            }
            Err(error) if is_duplicate_payment_intent(&error) => {
                tx.rollback().await?;

                let mut tx = self.db.begin().await?;

                let existing = self
                    .repository
                    .get_order_uuid_by_payment_intent(&mut tx, &order.payment_intent_id)
                    .await?;

                tx.commit().await?;

                info!(
                    payment_intent_id = %order.payment_intent_id,
                    order_uuid = %existing,
                    "order already materialized"
                );

                Ok(OrderPlacement::Existing(existing))
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.repository.list_orders(&mut tx).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<StatusChange, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let locked = self.repository.lock_order(&mut tx, order).await?;
        let previous = locked.status.parse::<OrderStatus>()?;

        self.repository.update_status(&mut tx, order, status).await?;

        let updated = self.repository.get_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(StatusChange {
            order: updated,
            transition: StatusTransition::new(previous, status),
        })
    }

    async fn append_note(&self, order: OrderUuid, note: String) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let locked = self.repository.lock_order(&mut tx, order).await?;
        let notes = append_note(locked.notes.as_deref(), &note);

        self.repository.update_notes(&mut tx, order, &notes).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn mark_delivery_email_sent(&self, order: OrderUuid) -> Result<(), OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .mark_delivery_email_sent(&mut tx, order)
            .await?;

        if rows_affected == 0 {
            return Err(OrdersServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Create an order and its items atomically. A second call for the same
    /// payment intent returns the existing order instead of failing.
    async fn create_order_with_items(
        &self,
        order: NewOrder,
    ) -> Result<OrderPlacement, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;

    /// Retrieve every order with its items, newest first.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Write a new status, returning the order and the status it replaced.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<StatusChange, OrdersServiceError>;

    /// Append a line to the order's notes.
    async fn append_note(&self, order: OrderUuid, note: String) -> Result<(), OrdersServiceError>;

    /// Record that the delivery email went out.
    async fn mark_delivery_email_sent(&self, order: OrderUuid) -> Result<(), OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use attar::{cart::CartLine, ids::PerfumeUuid, purchaser::Purchaser};
    use testresult::TestResult;

    use crate::{domain::orders::models::OrderItem, test::TestContext};

    use super::*;

    const ADDRESS: &str = "Villa 7, Jumeirah, Dubai | Contact: Mariam | Email: mariam@example.com";

    fn new_order(intent: &str, lines: Vec<CartLine>) -> NewOrder {
        let total = lines
            .iter()
            .map(|line| line.unit_price * u64::from(line.quantity))
            .sum::<u64>()
            + 100;

        NewOrder {
            uuid: OrderUuid::new(),
            payment_intent_id: intent.to_string(),
            purchaser: Purchaser::guest_from_address(ADDRESS),
            lines,
            total,
            delivery_address: ADDRESS.to_string(),
        }
    }

    #[tokio::test]
    async fn create_order_stores_items_and_guest_contact() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Oud Royale", 250_00).await;
        let order = new_order("pi_create", vec![CartLine::new(perfume, 2, 250_00)]);
        let uuid = order.uuid;

        let placement = ctx.orders.create_order_with_items(order).await?;

        assert_eq!(placement, OrderPlacement::Created(uuid));

        let stored = ctx.orders.get_order(uuid).await?;

        assert_eq!(stored.status, OrderStatus::Processing);
        assert_eq!(stored.total, 500_00 + 100);
        assert_eq!(stored.guest_name.as_deref(), Some("Mariam"));
        assert_eq!(stored.guest_email.as_deref(), Some("mariam@example.com"));
        assert_eq!(
            stored.items,
            vec![OrderItem {
                perfume,
                quantity: 2,
                price: 250_00,
            }]
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_order_for_the_same_intent_returns_the_first() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Musk", 120_00).await;

        let first = new_order("pi_twice", vec![CartLine::new(perfume, 1, 120_00)]);
        let first_uuid = first.uuid;

        ctx.orders.create_order_with_items(first).await?;

        let retry = ctx
            .orders
            .create_order_with_items(new_order("pi_twice", vec![CartLine::new(perfume, 1, 120_00)]))
            .await?;

        assert_eq!(retry, OrderPlacement::Existing(first_uuid));
        assert_eq!(ctx.count("orders").await, 1);
        assert_eq!(ctx.count("order_items").await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn failed_item_insert_rolls_back_the_order() {
        let ctx = TestContext::new().await;
        let listed = ctx.create_perfume("Amber", 90_00).await;

        let result = ctx
            .orders
            .create_order_with_items(new_order(
                "pi_rollback",
                vec![
                    CartLine::new(listed, 1, 90_00),
                    CartLine::new(PerfumeUuid::new(), 1, 90_00),
                ],
            ))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );
        assert_eq!(ctx.count("orders").await, 0);
        assert_eq!(ctx.count("order_items").await, 0);
    }

    #[tokio::test]
    async fn order_without_items_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .create_order_with_items(new_order("pi_empty", Vec::new()))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
        assert_eq!(ctx.count("orders").await, 0);
    }

    #[tokio::test]
    async fn update_status_reports_the_previous_status() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Rose", 80_00).await;
        let order = new_order("pi_status", vec![CartLine::new(perfume, 1, 80_00)]);
        let uuid = order.uuid;

        ctx.orders.create_order_with_items(order).await?;

        let change = ctx.orders.update_status(uuid, OrderStatus::Delivered).await?;

        assert_eq!(change.transition.previous, OrderStatus::Processing);
        assert_eq!(change.transition.current, OrderStatus::Delivered);
        assert_eq!(change.order.status, OrderStatus::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_unknown_order_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .update_status(OrderUuid::new(), OrderStatus::Dispatched)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn notes_are_appended_and_delivery_email_flag_is_set() -> TestResult {
        let ctx = TestContext::new().await;
        let perfume = ctx.create_perfume("Vetiver", 70_00).await;
        let order = new_order("pi_notes", vec![CartLine::new(perfume, 1, 70_00)]);
        let uuid = order.uuid;

        ctx.orders.create_order_with_items(order).await?;
        ctx.orders.append_note(uuid, "Left with concierge".to_string()).await?;
        ctx.orders.mark_delivery_email_sent(uuid).await?;

        let stored = ctx.orders.get_order(uuid).await?;

        assert!(stored.notes.is_some_and(|notes| notes.contains("Left with concierge")));
        assert!(stored.delivery_email_sent);
        assert_eq!(ctx.orders.list_orders().await?.len(), 1);

        Ok(())
    }
}
