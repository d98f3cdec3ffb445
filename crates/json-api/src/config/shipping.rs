//! Shipping Config

use attar::pricing::ShippingPolicy;
use clap::Args;

/// Shipping fee settings.
#[derive(Debug, Args)]
pub struct ShippingConfig {
    /// Flat shipping fee in fils
    #[arg(long, env = "SHIPPING_FLAT_FEE_MINOR", default_value_t = 100_u64)]
    pub shipping_flat_fee_minor: u64,

    /// Total quantity from which shipping is free
    #[arg(long, env = "FREE_SHIPPING_QUANTITY", default_value_t = 2_u32)]
    pub free_shipping_quantity: u32,
}

impl ShippingConfig {
    pub(crate) const fn policy(&self) -> ShippingPolicy {
        ShippingPolicy {
            flat_fee: self.shipping_flat_fee_minor,
            free_shipping_quantity: self.free_shipping_quantity,
        }
    }
}
