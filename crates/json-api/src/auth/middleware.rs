//! Auth middleware.

use std::sync::Arc;

use attar_app::identity::models::IdentityUser;
use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::{debug, warn};

use crate::{auth::errors::into_status_error, extensions::*, state::State};

/// Require a signed-in customer.
#[salvo::handler]
pub(crate) async fn customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if authenticate(req, depot, res).await {
        ctrl.call_next(req, depot, res).await;
    } else {
        ctrl.skip_rest();
    }
}

/// Require a signed-in user with the admin role.
#[salvo::handler]
pub(crate) async fn admin(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if !authenticate(req, depot, res).await {
        ctrl.skip_rest();

        return;
    }

    let is_admin = depot
        .identity_or_401()
        .is_ok_and(IdentityUser::is_admin);

    if !is_admin {
        warn!("non-admin user attempted admin access");

        res.render(StatusError::forbidden().brief("Admin role required"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

/// Introspect the bearer token and store the user in the depot. Renders the
/// error response and returns `false` when the caller is not authenticated.
async fn authenticate(req: &Request, depot: &mut Depot, res: &mut Response) -> bool {
    let Some(authorization) = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));

        return false;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);

            return false;
        }
    };

    match state.app.identity.authenticate(authorization).await {
        Ok(user) => {
            debug!(user_uuid = %user.id, "authenticated request");
            depot.insert_identity(user);

            true
        }
        Err(error) => {
            res.render(into_status_error(error));

            false
        }
    }
}
