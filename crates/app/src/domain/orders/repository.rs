//! Orders Repository

use attar::{
    ids::{OrderUuid, UserUuid},
    orders::OrderStatus,
};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
    types::Json,
};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::orders::models::{NewOrder, Order, OrderItem},
};

const CREATE_ORDER_WITH_ITEMS_SQL: &str = include_str!("sql/create_order_with_items.sql");
const GET_ORDER_UUID_BY_PAYMENT_INTENT_SQL: &str =
    include_str!("sql/get_order_uuid_by_payment_intent.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const UPDATE_ORDER_NOTES_SQL: &str = include_str!("sql/update_order_notes.sql");
const MARK_DELIVERY_EMAIL_SENT_SQL: &str = include_str!("sql/mark_delivery_email_sent.sql");

/// Status and notes of a row locked for update.
#[derive(Debug, Clone)]
pub(crate) struct LockedOrder {
    pub(crate) status: String,
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_with_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
    ) -> Result<OrderUuid, sqlx::Error> {
        let purchaser = &order.purchaser;

        let (guest_name, guest_email, guest_phone) = if purchaser.is_guest() {
            (purchaser.name(), purchaser.email(), purchaser.phone())
        } else {
            (None, None, None)
        };

        let uuid: Uuid = query_scalar(CREATE_ORDER_WITH_ITEMS_SQL)
            .bind(order.uuid.into_uuid())
            .bind(Json(&order.lines))
            .bind(amount_to_i64(order.total, "total")?)
            .bind(purchaser.user().map(UserUuid::into_uuid))
            .bind(guest_name)
            .bind(guest_email)
            .bind(guest_phone)
            .bind(&order.delivery_address)
            .bind(&order.payment_intent_id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(OrderUuid::from_uuid(uuid))
    }

    pub(crate) async fn get_order_uuid_by_payment_intent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_intent_id: &str,
    ) -> Result<OrderUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(GET_ORDER_UUID_BY_PAYMENT_INTENT_SQL)
            .bind(payment_intent_id)
            .fetch_one(&mut **tx)
            .await?;

        Ok(OrderUuid::from_uuid(uuid))
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_ORDERS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<LockedOrder, sqlx::Error> {
        let row = query(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(LockedOrder {
            status: row.try_get("status")?,
            notes: row.try_get("notes")?,
        })
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn update_notes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        notes: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_NOTES_SQL)
            .bind(order.into_uuid())
            .bind(notes)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn mark_delivery_email_sent(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_DELIVERY_EMAIL_SENT_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let Json(items) = row.try_get::<Json<Vec<OrderItem>>, _>("items")?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            payment_intent_id: row.try_get("payment_intent_id")?,
            user: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            guest_name: row.try_get("guest_name")?,
            guest_email: row.try_get("guest_email")?,
            guest_phone: row.try_get("guest_phone")?,
            status,
            total: try_get_amount(row, "total")?,
            delivery_address: row.try_get("delivery_address")?,
            notes: row.try_get("notes")?,
            delivery_email_sent: row.try_get("delivery_email_sent")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            items,
        })
    }
}
