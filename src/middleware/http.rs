//! HTTP-level middleware (cross-cutting concerns).
//!
//! Applied once to the whole app, outside the per-route guards.
//!
//! Responsibility:
//! - Request-Id generation + propagation (X-Request-Id)
//! - Hiding credential headers from access logs
//! - Access logging / request tracing (TraceLayer)
//! - Body size limits
//! - Global timeout (also bounds the identity service call)

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::http::{StatusCode, header, header::HeaderName};
use tower::timeout::TimeoutLayer;
use tower::{BoxError, ServiceBuilder};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::{
    SetSensitiveRequestHeadersLayer, SetSensitiveResponseHeadersLayer,
};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::auth::vpc::CROSS_KEY_HEADER;
use crate::services::auth::credentials::AUTH_TOKEN_HEADER;

/// Apply HTTP-level middleware to the given Router.
///
/// - Request-Id header: `x-request-id`
/// - Body limit / timeout: from `Config`
pub fn apply(router: Router, config: &Config) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");

    let sensitive_request: Arc<[HeaderName]> = Arc::new([
        header::COOKIE,
        header::AUTHORIZATION,
        HeaderName::from_static(AUTH_TOKEN_HEADER),
        HeaderName::from_static(CROSS_KEY_HEADER),
    ]);

    let layers = ServiceBuilder::new()
        // Make the service error `Infallible` by converting errors into responses.
        .layer(HandleErrorLayer::new(|err: BoxError| async move {
            if err.is::<tower::timeout::error::Elapsed>() {
                StatusCode::REQUEST_TIMEOUT
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }))
        .layer(SetSensitiveRequestHeadersLayer::from_shared(sensitive_request))
        .layer(SetSensitiveResponseHeadersLayer::new([header::SET_COOKIE]))
        // Generate a request id if missing, then propagate it to the response.
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(RequestBodyLimitLayer::new(config.body_limit_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_seconds,
        )))
        // Access log / tracing for all requests.
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
