//! Fulfilment
//!
//! Admin status changes and the side effects of entering `delivered` or
//! `returned`. The status write always stands; side effects that fail are
//! reported as warnings.

mod errors;
pub mod models;
mod service;

pub use errors::FulfilmentError;
pub use service::*;
