//! Checkout orchestration, persistence and provider adapters for the Attar
//! storefront.

pub mod checkout;
pub mod context;
pub mod database;
pub mod domain;
pub mod fulfilment;
pub mod identity;
pub mod notifications;
pub mod partial_failure;
pub mod payment_provider;

#[cfg(test)]
mod test;
