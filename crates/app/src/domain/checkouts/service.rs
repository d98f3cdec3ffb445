//! Pending checkouts service.

use async_trait::async_trait;
use attar::ids::OrderUuid;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::checkouts::{
        errors::PendingCheckoutsServiceError,
        models::{NewPendingCheckout, PendingCheckout},
        repository::PgPendingCheckoutsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPendingCheckoutsService {
    db: Db,
    repository: PgPendingCheckoutsRepository,
}

impl PgPendingCheckoutsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPendingCheckoutsRepository::new(),
        }
    }
}

#[async_trait]
impl PendingCheckoutsService for PgPendingCheckoutsService {
    async fn create_pending_checkout(
        &self,
        checkout: NewPendingCheckout,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_pending_checkout(&mut tx, &checkout)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_pending_checkout(
        &self,
        intent_id: &str,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let checkout = self
            .repository
            .get_pending_checkout(&mut tx, intent_id)
            .await?;

        tx.commit().await?;

        Ok(checkout)
    }

    async fn complete_pending_checkout(
        &self,
        intent_id: &str,
        order: OrderUuid,
    ) -> Result<(), PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository
            .complete_pending_checkout(&mut tx, intent_id, order)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<u64, PendingCheckoutsServiceError> {
        let mut tx = self.db.begin().await?;

        let purged = self.repository.purge_expired(&mut tx, now).await?;

        tx.commit().await?;

        Ok(purged)
    }
}

#[automock]
#[async_trait]
pub trait PendingCheckoutsService: Send + Sync {
    /// Record a checkout awaiting payment.
    async fn create_pending_checkout(
        &self,
        checkout: NewPendingCheckout,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError>;

    /// Retrieve a checkout by payment intent id.
    async fn get_pending_checkout(
        &self,
        intent_id: &str,
    ) -> Result<PendingCheckout, PendingCheckoutsServiceError>;

    /// Link a checkout to the order it produced. Completing twice is a no-op.
    async fn complete_pending_checkout(
        &self,
        intent_id: &str,
        order: OrderUuid,
    ) -> Result<(), PendingCheckoutsServiceError>;

    /// Delete expired checkouts that never produced an order.
    async fn purge_expired(&self, now: Timestamp) -> Result<u64, PendingCheckoutsServiceError>;
}
