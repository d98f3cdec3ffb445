//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use attar::{ids::UserUuid, pricing::ShippingPolicy};
use attar_app::{
    checkout::MockCheckoutService,
    context::AppContext,
    domain::{
        carts::MockCartsService, catalog::MockCatalogService, inventory::MockInventoryService,
        orders::MockOrdersService,
    },
    fulfilment::MockFulfilmentService,
    identity::{
        IdentityResolver, MockIdentityProvider,
        models::{ADMIN_ROLE, IdentityUser, UserMetadata},
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

/// Mock-backed services. Any call without an expectation fails the test.
#[derive(Default)]
pub(crate) struct MockApp {
    pub(crate) catalog: MockCatalogService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) inventory: MockInventoryService,
    pub(crate) identity: MockIdentityProvider,
    pub(crate) checkout: MockCheckoutService,
    pub(crate) fulfilment: MockFulfilmentService,
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(
            AppContext {
                catalog: Arc::new(self.catalog),
                carts: Arc::new(self.carts),
                orders: Arc::new(self.orders),
                inventory: Arc::new(self.inventory),
                identity: IdentityResolver::new(Arc::new(self.identity)),
                checkout: Arc::new(self.checkout),
                fulfilment: Arc::new(self.fulfilment),
            },
            ShippingPolicy::default(),
        )
    }
}

pub(crate) fn test_user(role: Option<&str>) -> IdentityUser {
    IdentityUser {
        id: TEST_USER_UUID,
        email: Some("noor@example.com".to_string()),
        metadata: UserMetadata {
            full_name: Some("Noor".to_string()),
            phone: None,
            role: role.map(ToString::to_string),
        },
    }
}

#[salvo::handler]
pub(crate) async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(test_user(None));
    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
pub(crate) async fn inject_admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_identity(test_user(Some(ADMIN_ROLE)));
    ctrl.call_next(req, depot, res).await;
}

/// Service without an authenticated user.
pub(crate) fn public_service(app: MockApp, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(app.into_state())).push(route))
}

/// Service with a signed-in customer.
pub(crate) fn customer_service(app: MockApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_customer)
            .push(route),
    )
}

/// Service with a signed-in admin.
pub(crate) fn admin_service(app: MockApp, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(app.into_state()))
            .hoop(inject_admin)
            .push(route),
    )
}
