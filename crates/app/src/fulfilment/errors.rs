//! Fulfilment errors.

use thiserror::Error;

use crate::domain::orders::OrdersServiceError;

#[derive(Debug, Error)]
pub enum FulfilmentError {
    /// The status write itself failed; nothing was changed.
    #[error(transparent)]
    Orders(#[from] OrdersServiceError),
}
