//! Pending Checkouts
//!
//! Server-side record of an in-flight checkout, keyed by the payment intent
//! id. Written when the payment session is created and read back when the
//! payment is verified, so nothing the browser holds is trusted.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::PendingCheckoutsServiceError;
pub use service::*;
