//! Server configuration module

use clap::Parser;

use attar_app::context::AppConfig;

use crate::config::{
    db::DatabaseConfig,
    identity::IdentityConfig,
    notifications::NotificationsConfig,
    observability::{LoggingConfig, ObservabilityConfig},
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
    shipping::ShippingConfig,
};

pub(crate) mod db;
pub(crate) mod identity;
pub(crate) mod notifications;
pub(crate) mod observability;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod shipping;

/// Attar JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "attar-json", about = "Attar JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Payment provider and checkout session settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,

    /// Identity provider settings.
    #[command(flatten)]
    pub identity: IdentityConfig,

    /// Email provider settings.
    #[command(flatten)]
    pub notifications: NotificationsConfig,

    /// Shipping fee settings.
    #[command(flatten)]
    pub shipping: ShippingConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Settings needed to wire the application services.
    #[must_use]
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            database_url: self.database.database_url.clone(),
            database_max_connections: self.database.max_connections,
            database_acquire_timeout: self.database.acquire_timeout(),
            payment_provider: self.payments.provider_config(),
            identity: self.identity.provider_config(),
            email: self.notifications.email_config(),
            checkout: self.payments.checkout_config(self.shipping.policy()),
        }
    }
}
