//! Catalog Repository

use attar::ids::{PerfumeUuid, UserUuid};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::try_get_amount,
    domain::catalog::models::{Perfume, WishlistEntry},
};

const GET_PERFUMES_SQL: &str = include_str!("sql/get_perfumes.sql");
const GET_WISHLIST_SQL: &str = include_str!("sql/get_wishlist.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_perfumes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        perfumes: &[PerfumeUuid],
    ) -> Result<Vec<Perfume>, sqlx::Error> {
        let uuids: Vec<Uuid> = perfumes.iter().copied().map(PerfumeUuid::into_uuid).collect();

        query_as::<Postgres, Perfume>(GET_PERFUMES_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_wishlist(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<WishlistEntry>, sqlx::Error> {
        query_as::<Postgres, WishlistEntry>(GET_WISHLIST_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for Perfume {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: PerfumeUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            price: try_get_amount(row, "price")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for WishlistEntry {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            perfume: PerfumeUuid::from_uuid(row.try_get("perfume_uuid")?),
            name: row.try_get("name")?,
            brand: row.try_get("brand")?,
            price: try_get_amount(row, "price")?,
            added_at: row.try_get::<SqlxTimestamp, _>("added_at")?.to_jiff(),
        })
    }
}
