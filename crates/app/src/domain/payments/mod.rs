//! Successful Payments
//!
//! Ledger of verified payments, one row per payment intent. Looking up a row
//! here is how verification recognises a payment it has already processed.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::PaymentRecordsServiceError;
pub use service::*;
