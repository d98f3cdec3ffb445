//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::{
    checkout::{CheckoutDependencies, CheckoutService, DefaultCheckoutService, models::CheckoutConfig},
    database::{self, Db},
    domain::{
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        checkouts::{PendingCheckoutsService, PgPendingCheckoutsService},
        inventory::{InventoryService, PgInventoryService},
        orders::{OrdersService, PgOrdersService},
        payments::{PaymentRecordsService, PgPaymentRecordsService},
    },
    fulfilment::{DefaultFulfilmentService, FulfilmentService},
    identity::{
        HttpIdentityProvider, IdentityError, IdentityProvider, IdentityProviderConfig,
        IdentityResolver,
    },
    notifications::{EmailConfig, HttpNotifier, NotificationError, Notifier},
    payment_provider::{
        HttpPaymentProvider, PaymentProvider, PaymentProviderConfig, PaymentProviderError,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build payment provider client")]
    PaymentProvider(#[source] PaymentProviderError),

    #[error("failed to build identity provider client")]
    Identity(#[source] IdentityError),

    #[error("failed to build email provider client")]
    Notifications(#[source] NotificationError),
}

/// Everything needed to wire the application together.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub payment_provider: PaymentProviderConfig,
    pub identity: IdentityProviderConfig,
    pub email: EmailConfig,
    pub checkout: CheckoutConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub inventory: Arc<dyn InventoryService>,
    pub identity: IdentityResolver,
    pub checkout: Arc<dyn CheckoutService>,
    pub fulfilment: Arc<dyn FulfilmentService>,
}

impl AppContext {
    /// Connect to the database and build every service.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails or an
    /// HTTP client cannot be built.
    pub async fn from_config(config: AppConfig) -> Result<Self, AppInitError> {
        let pool = database::connect_pool(
            &config.database_url,
            config.database_max_connections,
            config.database_acquire_timeout,
        )
        .await
        .map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        let payment_provider: Arc<dyn PaymentProvider> = Arc::new(
            HttpPaymentProvider::new(config.payment_provider)
                .map_err(AppInitError::PaymentProvider)?,
        );

        let identity_provider: Arc<dyn IdentityProvider> = Arc::new(
            HttpIdentityProvider::new(config.identity).map_err(AppInitError::Identity)?,
        );

        let notifier: Arc<dyn Notifier> =
            Arc::new(HttpNotifier::new(config.email).map_err(AppInitError::Notifications)?);

        Ok(Self::from_services(
            Services {
                catalog: Arc::new(PgCatalogService::new(db.clone())),
                carts: Arc::new(PgCartsService::new(db.clone())),
                pending_checkouts: Arc::new(PgPendingCheckoutsService::new(db.clone())),
                orders: Arc::new(PgOrdersService::new(db.clone())),
                payments: Arc::new(PgPaymentRecordsService::new(db.clone())),
                inventory: Arc::new(PgInventoryService::new(db)),
                identity_provider,
                payment_provider,
                notifier,
            },
            config.checkout,
        ))
    }

    /// Wire the checkout and fulfilment flows over the given services.
    #[must_use]
    pub fn from_services(services: Services, checkout: CheckoutConfig) -> Self {
        let identity = IdentityResolver::new(services.identity_provider);

        let checkout_service = DefaultCheckoutService::new(
            CheckoutDependencies {
                identity: identity.clone(),
                catalog: services.catalog.clone(),
                carts: services.carts.clone(),
                pending_checkouts: services.pending_checkouts,
                orders: services.orders.clone(),
                payments: services.payments.clone(),
                payment_provider: services.payment_provider,
                notifier: services.notifier.clone(),
            },
            checkout,
        );

        let fulfilment = DefaultFulfilmentService::new(
            services.orders.clone(),
            services.inventory.clone(),
            services.payments,
            services.notifier,
        );

        Self {
            catalog: services.catalog,
            carts: services.carts,
            orders: services.orders,
            inventory: services.inventory,
            identity,
            checkout: Arc::new(checkout_service),
            fulfilment: Arc::new(fulfilment),
        }
    }
}

/// Storage services and external adapters.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
    pub carts: Arc<dyn CartsService>,
    pub pending_checkouts: Arc<dyn PendingCheckoutsService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentRecordsService>,
    pub inventory: Arc<dyn InventoryService>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub notifier: Arc<dyn Notifier>,
}
