//! Payments Config

use std::time::Duration;

use attar::pricing::ShippingPolicy;
use attar_app::{checkout::models::CheckoutConfig, payment_provider::PaymentProviderConfig};
use clap::Args;
use jiff::SignedDuration;

/// Payment provider and checkout session settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Payment provider API base URL
    #[arg(
        long,
        env = "PAYMENT_PROVIDER_URL",
        default_value = "https://api-v2.ziina.com/api"
    )]
    pub payment_provider_url: String,

    /// Payment provider secret key
    #[arg(long, env = "PAYMENT_PROVIDER_SECRET", hide_env_values = true)]
    pub payment_provider_secret: String,

    /// Payment provider request timeout in seconds
    #[arg(long, env = "PAYMENT_PROVIDER_TIMEOUT_SECONDS", default_value_t = 30_u64)]
    pub payment_provider_timeout_seconds: u64,

    /// How long a payment session stays open, in minutes
    #[arg(long, env = "CHECKOUT_SESSION_TTL_MINUTES", default_value_t = 15_u32)]
    pub checkout_session_ttl_minutes: u32,

    /// Storefront base URL for the success, cancel and failure redirects
    #[arg(long, env = "STOREFRONT_URL")]
    pub storefront_url: String,

    /// Create payment intents in test mode
    #[arg(long, env = "PAYMENT_TEST_MODE", default_value_t = false)]
    pub payment_test_mode: bool,
}

impl PaymentsConfig {
    pub(crate) fn provider_config(&self) -> PaymentProviderConfig {
        PaymentProviderConfig {
            base_url: self.payment_provider_url.clone(),
            secret_key: self.payment_provider_secret.clone(),
            timeout: Duration::from_secs(self.payment_provider_timeout_seconds),
        }
    }

    pub(crate) fn checkout_config(&self, shipping: ShippingPolicy) -> CheckoutConfig {
        CheckoutConfig {
            shipping,
            session_ttl: SignedDuration::from_mins(i64::from(self.checkout_session_ttl_minutes)),
            storefront_url: self.storefront_url.clone(),
            test_mode: self.payment_test_mode,
        }
    }
}
