//! Checkout Handlers

pub(crate) mod create_session;
pub(crate) mod verify;
pub(crate) mod webhook;
