//! Checkout errors.

use attar::{cart::CartError, pricing::PricingError};
use thiserror::Error;

use crate::{
    domain::{
        carts::CartsServiceError, catalog::CatalogServiceError,
        checkouts::PendingCheckoutsServiceError, orders::OrdersServiceError,
        payments::PaymentRecordsServiceError,
    },
    identity::IdentityError,
    payment_provider::PaymentProviderError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The request cannot be charged as submitted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The payment provider failed or refused; start a new session.
    #[error(transparent)]
    PaymentProvider(#[from] PaymentProviderError),

    #[error(transparent)]
    Authentication(#[from] IdentityError),

    /// Storage failed or the payment needs manual reconciliation.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("delivery address is required")]
    MissingDeliveryAddress,

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("session expiry is out of range")]
    InvalidExpiry(#[source] jiff::Error),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No pending checkout was recorded for the payment intent.
    #[error("no pending checkout for payment intent {0}")]
    UnknownCheckout(String),

    #[error(
        "amount mismatch for payment intent {intent_id}: \
         recomputed {recomputed}, pending {pending}, confirmed {confirmed}"
    )]
    AmountMismatch {
        intent_id: String,
        recomputed: u64,
        pending: u64,
        confirmed: u64,
    },

    #[error(
        "currency mismatch for payment intent {intent_id}: expected {expected}, confirmed {confirmed}"
    )]
    CurrencyMismatch {
        intent_id: String,
        expected: String,
        confirmed: String,
    },

    /// The pending lines could no longer be priced.
    #[error("failed to re-price pending checkout")]
    Repricing(#[source] PricingError),

    #[error("pending checkout lines can no longer be priced")]
    RepricingCart(#[source] CartError),

    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),

    #[error(transparent)]
    Carts(#[from] CartsServiceError),

    #[error(transparent)]
    PendingCheckouts(#[from] PendingCheckoutsServiceError),

    #[error(transparent)]
    Orders(#[from] OrdersServiceError),

    #[error(transparent)]
    Payments(#[from] PaymentRecordsServiceError),
}
