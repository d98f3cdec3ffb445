//! Attar
//!
//! Checkout domain for the Attar perfume storefront: cart aggregation, the
//! shipping and pricing policy, delivery-address encoding, purchaser identity,
//! order status transitions and stock arithmetic. Nothing in this crate performs
//! I/O; the `attar-app` crate wires these types to storage and external
//! providers.

pub mod address;
pub mod cart;
pub mod ids;
pub mod inventory;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod purchaser;
