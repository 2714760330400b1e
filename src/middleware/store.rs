//! init_store_facility: attach a store handle to the request.
//!
//! The facility (URL-configured or default client) is chosen once at startup
//! from `REDIS_URL`; each request gets its own cheap `StoreHandle` clone in
//! the extensions. Nothing connects until a handler uses the handle.

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::state::AppState;

pub async fn init_store_facility(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    req.extensions_mut().insert(state.store.handle());
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{Extension, Router, body::to_bytes, http::StatusCode, routing::get};
    use axum_extra::extract::cookie::Key;
    use tower::ServiceExt;
    use url::Url;

    use super::*;
    use crate::middleware::guards::{self, Guard};
    use crate::services::auth::{CredentialResolver, HttpTokenValidator};
    use crate::services::store::{StoreFacility, StoreHandle};

    fn state(redis_url: Option<&str>) -> AppState {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let validator = HttpTokenValidator::new(&base).unwrap();

        AppState::new(
            Arc::new(CredentialResolver::new(Arc::new(validator))),
            Key::generate(),
            false,
            None,
            StoreFacility::new(redis_url).unwrap(),
        )
    }

    async fn url_configured(state: AppState) -> (StatusCode, String) {
        let router = Router::new().route(
            "/",
            get(|Extension(store): Extension<StoreHandle>| async move {
                store.is_url_configured().to_string()
            }),
        );
        let router = guards::apply(router, &state, &[Guard::StoreFacility]).with_state(state);

        let res = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn handler_receives_store_handle() {
        let (status, body) = url_configured(state(Some("redis://cache.internal:6380/2"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "true");

        let (status, body) = url_configured(state(None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "false");
    }

    #[tokio::test]
    async fn handle_is_missing_without_the_guard() {
        let router = Router::new()
            .route(
                "/",
                get(|Extension(_): Extension<StoreHandle>| async { "handler" }),
            )
            .with_state(state(None));

        let res = router
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
