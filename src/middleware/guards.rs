//! Ordered guard composition.
//!
//! A route group declares its guards as a list; the first guard in the list
//! sees the request first. Identity gates must come after `CheckCredentials`.
//!
//! ```ignore
//! let admin = Router::new().route("/admin", get(admin));
//! let admin = guards::apply(admin, &state, &[Guard::CheckCredentials, Guard::AdminOnly]);
//! ```

use axum::{Router, middleware};

use crate::middleware::{auth, store};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// Resolve credentials into a `RequestCtx` (never rejects).
    CheckCredentials,
    /// 403 unless `X-Scheme: https`.
    HttpsRequired,
    /// 401 unless an identity was resolved.
    Authenticated,
    /// 401 when anonymous, 403 unless the role is `Administrator`.
    AdminOnly,
    /// Terminal JSON 401 unless a valid cross token is presented.
    VpcOnly,
    /// Attach a `StoreHandle` to the request.
    StoreFacility,
}

impl Guard {
    fn wrap(self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        let state = state.clone();
        match self {
            Guard::CheckCredentials => router.route_layer(middleware::from_fn_with_state(
                state,
                auth::check_credentials,
            )),
            Guard::HttpsRequired => router.route_layer(middleware::from_fn(auth::https_required)),
            Guard::Authenticated => {
                router.route_layer(middleware::from_fn(auth::api_authenticated))
            }
            Guard::AdminOnly => router.route_layer(middleware::from_fn(auth::allow_admin)),
            Guard::VpcOnly => router.route_layer(middleware::from_fn_with_state(
                state,
                auth::vpc_access_only,
            )),
            Guard::StoreFacility => router.route_layer(middleware::from_fn_with_state(
                state,
                store::init_store_facility,
            )),
        }
    }
}

/// Apply `guards` to every route of `router`, in list order.
pub fn apply(router: Router<AppState>, state: &AppState, guards: &[Guard]) -> Router<AppState> {
    // The last layer added is the outermost one, so wrap in reverse.
    guards
        .iter()
        .rev()
        .fold(router, |router, guard| guard.wrap(router, state))
}
