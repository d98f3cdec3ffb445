//! Payment records service.

use async_trait::async_trait;
use attar::ids::OrderUuid;
use mockall::automock;

use crate::{
    database::Db,
    domain::payments::{
        errors::PaymentRecordsServiceError,
        models::{NewSuccessfulPayment, SuccessfulPayment},
        repository::PgPaymentRecordsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPaymentRecordsService {
    db: Db,
    repository: PgPaymentRecordsRepository,
}

impl PgPaymentRecordsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPaymentRecordsRepository::new(),
        }
    }
}

#[async_trait]
impl PaymentRecordsService for PgPaymentRecordsService {
    async fn find_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<SuccessfulPayment>, PaymentRecordsServiceError> {
        let mut tx = self.db.begin().await?;

        let payment = self
            .repository
            .find_by_payment_id(&mut tx, payment_id)
            .await?;

        tx.commit().await?;

        Ok(payment)
    }

    async fn find_by_order(
        &self,
        order: OrderUuid,
    ) -> Result<Option<SuccessfulPayment>, PaymentRecordsServiceError> {
        let mut tx = self.db.begin().await?;

        let payment = self.repository.find_by_order(&mut tx, order).await?;

        tx.commit().await?;

        Ok(payment)
    }

    async fn record_payment(
        &self,
        payment: NewSuccessfulPayment,
    ) -> Result<bool, PaymentRecordsServiceError> {
        let mut tx = self.db.begin().await?;

        let inserted = self.repository.create_payment(&mut tx, &payment).await?;

        tx.commit().await?;

        Ok(inserted)
    }

    async fn mark_email_sent(&self, payment_id: &str) -> Result<(), PaymentRecordsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.mark_email_sent(&mut tx, payment_id).await?;

        if rows_affected == 0 {
            return Err(PaymentRecordsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait PaymentRecordsService: Send + Sync {
    /// Keyed lookup by payment intent id.
    async fn find_by_payment_id(
        &self,
        payment_id: &str,
    ) -> Result<Option<SuccessfulPayment>, PaymentRecordsServiceError>;

    /// Payment record for an order, if one was written.
    async fn find_by_order(
        &self,
        order: OrderUuid,
    ) -> Result<Option<SuccessfulPayment>, PaymentRecordsServiceError>;

    /// Write a payment record once. Returns `false` if it already existed.
    async fn record_payment(
        &self,
        payment: NewSuccessfulPayment,
    ) -> Result<bool, PaymentRecordsServiceError>;

    /// Record that the confirmation email went out.
    async fn mark_email_sent(&self, payment_id: &str) -> Result<(), PaymentRecordsServiceError>;
}
