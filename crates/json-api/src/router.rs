//! App Router

use salvo::Router;

use crate::{admin, auth, cart, checkout, healthcheck};

pub fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("checkout")
                .push(Router::with_path("sessions").post(checkout::handlers::create_session::handler))
                .push(Router::with_path("verify").get(checkout::handlers::verify::handler)),
        )
        .push(Router::with_path("webhooks/payments").post(checkout::handlers::webhook::handler))
        .push(
            Router::with_path("cart")
                .hoop(auth::middleware::customer)
                .get(cart::handlers::get::handler)
                .push(Router::with_path("merge").post(cart::handlers::merge::handler))
                .push(
                    Router::with_path("items/{perfume}")
                        .put(cart::handlers::set_item::handler)
                        .delete(cart::handlers::remove_item::handler),
                ),
        )
        .push(
            Router::with_path("admin")
                .hoop(auth::middleware::admin)
                .push(
                    Router::with_path("orders")
                        .get(admin::orders::handlers::index::handler)
                        .push(
                            Router::with_path("{order}")
                                .get(admin::orders::handlers::get::handler)
                                .push(
                                    Router::with_path("status")
                                        .put(admin::orders::handlers::update_status::handler),
                                ),
                        ),
                )
                .push(
                    Router::with_path("inventory/{perfume}")
                        .get(admin::inventory::handlers::get::handler)
                        .put(admin::inventory::handlers::adjust::handler)
                        .push(Router::with_path("log").get(admin::inventory::handlers::log::handler))
                        .push(
                            Router::with_path("additions")
                                .post(admin::inventory::handlers::add_stock::handler),
                        ),
                ),
        )
}
