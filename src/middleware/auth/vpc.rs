//! vpc_access_only: internal-network-only gate.
//!
//! Independent of the resolved identity. The caller must present a cross token
//! (see `services::auth::cross_token`) in `Cross-Key`; otherwise the request is
//! answered here with a terminal JSON 401 and the handler never runs.

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;

use crate::services::auth::cross_token;
use crate::state::AppState;

pub const CROSS_KEY_HEADER: &str = "cross-key";
pub const REAL_IP_HEADER: &str = "x-real-ip";

// Sent by callers that were never given a cross token.
const DEFAULT_CROSS_TOKEN: &str = "123456";

const UNAUTHORIZED_BODY: &str =
    r#"{"status": "unauthorized", "message": "This resource is available only to logged users."}"#;

pub async fn vpc_access_only(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    info!("This is a VPC Request");

    let remote_ip = req
        .headers()
        .get(REAL_IP_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string());
    info!(remote_ip = %remote_ip, "IP requesting VPC connection");

    let cross_token = req
        .headers()
        .get(CROSS_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CROSS_TOKEN);

    let Some(cross_key) = state.cross_key.as_deref() else {
        tracing::warn!("CROSS_KEY is not configured, rejecting VPC request");
        return unauthorized();
    };

    match cross_token::verify(cross_token, cross_key, Utc::now()) {
        Ok(()) => {
            info!("The key is valid.");
            next.run(req).await
        }
        Err(err) => {
            info!(error = %err, "The key is invalid.");
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=UTF-8"),
        )],
        UNAUTHORIZED_BODY,
    )
        .into_response()
}
