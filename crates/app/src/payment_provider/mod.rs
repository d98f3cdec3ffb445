//! Payment provider client.

mod client;
mod errors;
pub mod models;

pub use client::*;
pub use errors::PaymentProviderError;
