//! Admin Handlers
//!
//! Every route here sits behind the admin middleware.

pub(crate) mod inventory;
pub(crate) mod orders;
