//! Authorization gates.
//!
//! Each gate is a precondition checked before the handler runs. Identity gates
//! read the `RequestCtx` inserted by `check_credentials`; when it is missing the
//! request is anonymous.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use tracing::info;

use crate::api::v1::extractors::RequestCtx;
use crate::error::AppError;

/// Header set by the TLS-terminating proxy.
pub const SCHEME_HEADER: &str = "x-scheme";

pub async fn https_required(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let scheme = req
        .headers()
        .get(SCHEME_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    if scheme != "https" {
        return Err(AppError::forbidden("A SSL (https) connection is required."));
    }

    info!("HTTPS connection verified.");
    Ok(next.run(req).await)
}

pub async fn api_authenticated(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let ctx = request_ctx(&req);

    if !ctx.is_authenticated() {
        info!("Request not authenticated.");
        return Err(if ctx.token_invalid {
            AppError::unauthorized("Authentication credentials is invalid.")
        } else {
            AppError::unauthorized("Authentication required.")
        });
    }

    Ok(next.run(req).await)
}

pub async fn allow_admin(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    let ctx = request_ctx(&req);

    let Some(user) = ctx.current_user.as_ref() else {
        return Err(AppError::unauthorized("Acesso querer autenticação."));
    };

    if !user.is_administrator() {
        return Err(AppError::forbidden(
            "Acesso permitido somente aos administradores.",
        ));
    }

    Ok(next.run(req).await)
}

fn request_ctx(req: &Request<Body>) -> RequestCtx {
    req.extensions()
        .get::<RequestCtx>()
        .cloned()
        .unwrap_or_default()
}
