//! Payment Records Repository

use attar::ids::OrderUuid;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::payments::models::{NewSuccessfulPayment, ProductDetail, SuccessfulPayment},
};

const GET_PAYMENT_BY_PAYMENT_ID_SQL: &str = include_str!("sql/get_payment_by_payment_id.sql");
const GET_PAYMENT_BY_ORDER_SQL: &str = include_str!("sql/get_payment_by_order.sql");
const CREATE_PAYMENT_SQL: &str = include_str!("sql/create_payment.sql");
const MARK_EMAIL_SENT_SQL: &str = include_str!("sql/mark_email_sent.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPaymentRecordsRepository;

impl PgPaymentRecordsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_payment_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_id: &str,
    ) -> Result<Option<SuccessfulPayment>, sqlx::Error> {
        query_as::<Postgres, SuccessfulPayment>(GET_PAYMENT_BY_PAYMENT_ID_SQL)
            .bind(payment_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn find_by_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<SuccessfulPayment>, sqlx::Error> {
        query_as::<Postgres, SuccessfulPayment>(GET_PAYMENT_BY_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a payment record. Returns `false` when one already existed.
    pub(crate) async fn create_payment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment: &NewSuccessfulPayment,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(CREATE_PAYMENT_SQL)
            .bind(&payment.payment_id)
            .bind(payment.order.into_uuid())
            .bind(amount_to_i64(payment.amount, "amount")?)
            .bind(payment.customer_email.as_deref())
            .bind(payment.customer_name.as_deref())
            .bind(&payment.delivery_address)
            .bind(Json(&payment.product_details))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    pub(crate) async fn mark_email_sent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_EMAIL_SENT_SQL)
            .bind(payment_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for SuccessfulPayment {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let Json(product_details) = row.try_get::<Json<Vec<ProductDetail>>, _>("product_details")?;

        Ok(Self {
            payment_id: row.try_get("payment_id")?,
            order: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            amount: try_get_amount(row, "amount")?,
            customer_email: row.try_get("customer_email")?,
            customer_name: row.try_get("customer_name")?,
            delivery_address: row.try_get("delivery_address")?,
            product_details,
            email_sent: row.try_get("email_sent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
