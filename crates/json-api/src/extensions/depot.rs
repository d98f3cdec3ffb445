//! Depot helper extensions.

use std::any::Any;

use attar_app::identity::models::IdentityUser;
use salvo::prelude::{Depot, StatusError};

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_identity(&mut self, user: IdentityUser);

    fn identity_or_401(&self) -> Result<&IdentityUser, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_identity(&mut self, user: IdentityUser) {
        self.inject(user);
    }

    fn identity_or_401(&self) -> Result<&IdentityUser, StatusError> {
        self.obtain::<IdentityUser>()
            .map_err(|_ignored| StatusError::unauthorized())
    }
}
