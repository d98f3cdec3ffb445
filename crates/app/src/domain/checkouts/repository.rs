//! Pending Checkouts Repository

use attar::{cart::CartLine, ids::OrderUuid, purchaser::Purchaser};
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::checkouts::models::{NewPendingCheckout, PendingCheckout},
};

const CREATE_PENDING_CHECKOUT_SQL: &str = include_str!("sql/create_pending_checkout.sql");
const GET_PENDING_CHECKOUT_SQL: &str = include_str!("sql/get_pending_checkout.sql");
const COMPLETE_PENDING_CHECKOUT_SQL: &str = include_str!("sql/complete_pending_checkout.sql");
const PURGE_EXPIRED_SQL: &str = include_str!("sql/purge_expired_pending_checkouts.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPendingCheckoutsRepository;

impl PgPendingCheckoutsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        checkout: &NewPendingCheckout,
    ) -> Result<PendingCheckout, sqlx::Error> {
        query_as::<Postgres, PendingCheckout>(CREATE_PENDING_CHECKOUT_SQL)
            .bind(&checkout.intent_id)
            .bind(Json(&checkout.purchaser))
            .bind(Json(&checkout.lines))
            .bind(&checkout.delivery_address)
            .bind(amount_to_i64(checkout.amount, "amount")?)
            .bind(&checkout.currency)
            .bind(SqlxTimestamp::from(checkout.expires_at))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent_id: &str,
    ) -> Result<PendingCheckout, sqlx::Error> {
        query_as::<Postgres, PendingCheckout>(GET_PENDING_CHECKOUT_SQL)
            .bind(intent_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn complete_pending_checkout(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        intent_id: &str,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(COMPLETE_PENDING_CHECKOUT_SQL)
            .bind(intent_id)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn purge_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PURGE_EXPIRED_SQL)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PendingCheckout {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(purchaser) = row.try_get::<Json<Purchaser>, _>("purchaser")?;
        let Json(lines) = row.try_get::<Json<Vec<CartLine>>, _>("lines")?;

        Ok(Self {
            intent_id: row.try_get("payment_intent_id")?,
            purchaser,
            lines,
            delivery_address: row.try_get("delivery_address")?,
            amount: try_get_amount(row, "amount")?,
            currency: row.try_get("currency")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            expires_at: row.try_get::<SqlxTimestamp, _>("expires_at")?.to_jiff(),
            completed_order: row
                .try_get::<Option<Uuid>, _>("completed_order_uuid")?
                .map(OrderUuid::from_uuid),
        })
    }
}
