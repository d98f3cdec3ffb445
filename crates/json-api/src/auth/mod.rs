//! Authentication
//!
//! Bearer tokens are introspected with the identity provider on every
//! request. Admin routes additionally require the `admin` role.

pub(crate) mod errors;
pub(crate) mod middleware;
