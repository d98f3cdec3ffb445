//! Inventory service errors.

use attar::inventory::{InventoryError, UnknownChangeType};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryServiceError {
    #[error("inventory record not found")]
    NotFound,

    #[error("perfume not found")]
    InvalidReference,

    #[error("stock quantity cannot be negative (got {0})")]
    NegativeQuantity(i64),

    #[error("stock quantity {0} is out of range")]
    OutOfRange(i64),

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),

    #[error(transparent)]
    InvalidChangeType(#[from] UnknownChangeType),
}

impl From<InventoryError> for InventoryServiceError {
    fn from(error: InventoryError) -> Self {
        match error {
            InventoryError::NegativeQuantity(quantity) => Self::NegativeQuantity(quantity),
            InventoryError::OutOfRange(quantity) => Self::OutOfRange(quantity),
        }
    }
}

impl From<Error> for InventoryServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_quantity_is_carried_over() {
        let error = InventoryServiceError::from(InventoryError::NegativeQuantity(-3));

        assert!(matches!(error, InventoryServiceError::NegativeQuantity(-3)));
    }

    #[test]
    fn missing_row_is_not_found() {
        let error = InventoryServiceError::from(Error::RowNotFound);

        assert!(matches!(error, InventoryServiceError::NotFound));
    }
}
