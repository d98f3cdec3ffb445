//! State

use std::sync::Arc;

use attar::pricing::ShippingPolicy;
use attar_app::context::AppContext;

/// Shared handler state.
#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Shipping rule used to preview totals on the cart. Checkout prices with
    /// the same policy through `AppContext`.
    pub(crate) shipping: ShippingPolicy,
}

impl State {
    #[must_use]
    pub(crate) fn from_app_context(app: AppContext, shipping: ShippingPolicy) -> Arc<Self> {
        Arc::new(Self { app, shipping })
    }
}
