//! Catalog service.

use async_trait::async_trait;
use attar::ids::{PerfumeUuid, UserUuid};
use mockall::automock;

use crate::{
    database::Db,
    domain::catalog::{
        errors::CatalogServiceError,
        models::{Perfume, WishlistEntry},
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn get_perfumes(
        &self,
        perfumes: Vec<PerfumeUuid>,
    ) -> Result<Vec<Perfume>, CatalogServiceError> {
        if perfumes.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.db.begin().await?;

        let perfumes = self.repository.get_perfumes(&mut tx, &perfumes).await?;

        tx.commit().await?;

        Ok(perfumes)
    }

    async fn get_wishlist(&self, user: UserUuid) -> Result<Vec<WishlistEntry>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let wishlist = self.repository.get_wishlist(&mut tx, user).await?;

        tx.commit().await?;

        Ok(wishlist)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieve the listed perfumes among the given identifiers. Unknown or
    /// delisted perfumes are omitted.
    async fn get_perfumes(
        &self,
        perfumes: Vec<PerfumeUuid>,
    ) -> Result<Vec<Perfume>, CatalogServiceError>;

    /// Retrieve a customer's wishlist, most recently added first.
    async fn get_wishlist(&self, user: UserUuid) -> Result<Vec<WishlistEntry>, CatalogServiceError>;
}
