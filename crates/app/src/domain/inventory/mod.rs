//! Inventory
//!
//! Every stock update is written together with its audit log entry in one
//! transaction; the log is never updated or deleted.

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::InventoryServiceError;
pub use service::*;
