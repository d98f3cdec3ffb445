//! Notifications
//!
//! Order confirmation and delivery emails, rendered locally and handed to the
//! email provider. Sending is always best effort: callers turn a failure into
//! a warning and carry on.

mod client;
mod errors;
pub mod models;
pub mod templates;

pub use client::*;
pub use errors::NotificationError;
