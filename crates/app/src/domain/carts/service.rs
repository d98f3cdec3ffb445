//! Carts service.

use async_trait::async_trait;
use attar::{
    cart::{Cart, CartLine, validate_quantity},
    ids::{PerfumeUuid, UserUuid},
};
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::carts::{
        errors::CartsServiceError,
        models::UserCart,
        repository::PgCartsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    repository: PgCartsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCartsRepository::new(),
        }
    }

    /// Read the cart and rewrite any perfume that has more than one row.
    async fn read_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserCart, CartsServiceError> {
        let rows = self.repository.get_cart_items(tx, user).await?;
        let (cart, collapsed) = UserCart::from_rows(user, &rows);

        for perfume in &collapsed {
            let Some(item) = cart.items.iter().find(|item| item.perfume == *perfume) else {
                continue;
            };

            self.repository
                .collapse_cart_item(tx, user, *perfume, item.quantity)
                .await?;
        }

        if !collapsed.is_empty() {
            info!(
                user_uuid = %user,
                collapsed = collapsed.len(),
                "collapsed duplicate cart rows"
            );
        }

        Ok(cart)
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, user: UserUuid) -> Result<UserCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.read_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn set_item(
        &self,
        user: UserUuid,
        perfume: PerfumeUuid,
        quantity: u32,
    ) -> Result<UserCart, CartsServiceError> {
        validate_quantity(quantity)?;

        let mut tx = self.db.begin().await?;

        self.repository
            .put_cart_item(&mut tx, user, perfume, quantity)
            .await?;

        let cart = self.read_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn remove_item(
        &self,
        user: UserUuid,
        perfume: PerfumeUuid,
    ) -> Result<UserCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_cart_item(&mut tx, user, perfume)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let cart = self.read_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn merge(
        &self,
        user: UserUuid,
        lines: Vec<CartLine>,
    ) -> Result<UserCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut merged = self.read_cart(&mut tx, user).await?.to_cart();

        merged.merge(Cart::from_lines(lines));

        for line in merged.lines() {
            self.repository
                .put_cart_item(&mut tx, user, line.perfume, line.quantity)
                .await?;
        }

        let cart = self.read_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(cart)
    }

    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.repository.clear_cart(&mut tx, user).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a customer's cart priced from the catalog.
    async fn get_cart(&self, user: UserUuid) -> Result<UserCart, CartsServiceError>;

    /// Set the absolute quantity of a perfume, adding it if absent.
    async fn set_item(
        &self,
        user: UserUuid,
        perfume: PerfumeUuid,
        quantity: u32,
    ) -> Result<UserCart, CartsServiceError>;

    /// Removes a perfume from the cart.
    async fn remove_item(
        &self,
        user: UserUuid,
        perfume: PerfumeUuid,
    ) -> Result<UserCart, CartsServiceError>;

    /// Merge an anonymous cart into the customer's cart, capping each line.
    async fn merge(&self, user: UserUuid, lines: Vec<CartLine>)
    -> Result<UserCart, CartsServiceError>;

    /// Empty the cart.
    async fn clear(&self, user: UserUuid) -> Result<(), CartsServiceError>;
}
