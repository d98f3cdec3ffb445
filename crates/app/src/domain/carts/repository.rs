//! Carts Repository

use attar::ids::{PerfumeUuid, UserUuid};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{quantity_to_i32, try_get_amount, try_get_quantity},
    domain::carts::models::{CartItemUuid, StoredCartItem},
};

const GET_CART_WITH_PERFUMES_SQL: &str = include_str!("sql/get_cart_with_perfumes.sql");
const UPDATE_CART_ITEM_QUANTITY_SQL: &str = include_str!("sql/update_cart_item_quantity.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("sql/create_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("sql/delete_cart_item.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<StoredCartItem>, sqlx::Error> {
        query_as::<Postgres, StoredCartItem>(GET_CART_WITH_PERFUMES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Set the quantity of a perfume, inserting a row if the cart has none.
    pub(crate) async fn put_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        perfume: PerfumeUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        let quantity = quantity_to_i32(quantity, "quantity")?;

        let rows_affected = query(UPDATE_CART_ITEM_QUANTITY_SQL)
            .bind(user.into_uuid())
            .bind(perfume.into_uuid())
            .bind(quantity)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            query(CREATE_CART_ITEM_SQL)
                .bind(CartItemUuid::new().into_uuid())
                .bind(user.into_uuid())
                .bind(perfume.into_uuid())
                .bind(quantity)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        perfume: PerfumeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(user.into_uuid())
            .bind(perfume.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Replace every row for a perfume with a single row.
    pub(crate) async fn collapse_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        perfume: PerfumeUuid,
        quantity: u32,
    ) -> Result<(), sqlx::Error> {
        self.delete_cart_item(tx, user, perfume).await?;

        query(CREATE_CART_ITEM_SQL)
            .bind(CartItemUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(perfume.into_uuid())
            .bind(quantity_to_i32(quantity, "quantity")?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for StoredCartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            perfume: PerfumeUuid::from_uuid(row.try_get("perfume_uuid")?),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            price: try_get_amount(row, "price")?,
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
