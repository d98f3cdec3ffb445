//! Identity
//!
//! Resolves who is paying for a checkout, either a guest described by the
//! delivery address or a registered customer behind a bearer token.

mod bearer;
mod client;
mod errors;
pub mod models;
mod resolver;

pub use bearer::bearer_token;
pub use client::*;
pub use errors::IdentityError;
pub use resolver::*;
