//! Checkout
//!
//! Creates payment sessions and turns verified payments into orders.

mod errors;
pub mod models;
mod service;

pub use errors::*;
pub use service::*;
