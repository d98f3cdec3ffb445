//! Checkout
//!
//! Payment sessions, the redirect-back verification and provider webhooks.
//! None of these routes require a signed-in user; registered checkouts pass
//! their bearer token through to purchaser resolution.

pub(crate) mod errors;
pub(crate) mod handlers;
