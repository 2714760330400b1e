//! check_credentials: credentials → identity service → RequestCtx を extensions に入れる
//!
//! - 認証の成否ではリクエストを拒否しない（拒否は gates の責務）
//! - appKey cookie の再発行が必要な場合は response に Set-Cookie を付ける

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::info;

use crate::api::v1::extractors::RequestCtx;
use crate::services::auth::{Credentials, credentials::app_cookie};
use crate::state::AppState;

pub async fn check_credentials(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    info!("Authentication Process Started");

    let credentials = Credentials::from_headers(req.headers(), &state.cookie_key);
    let resolution = state.resolver.resolve(credentials).await;

    info!(
        authenticated = resolution.current_user.is_some(),
        token_invalid = resolution.token_invalid,
        "Authentication Process Finished"
    );

    // middleware → gate / extractor への受け渡し
    req.extensions_mut().insert(RequestCtx::from(&resolution));

    let response = next.run(req).await;

    let refreshed = resolution
        .refresh_app_cookie
        .as_ref()
        .and_then(|identity| app_cookie(identity, state.secure_cookies));

    match refreshed {
        Some(cookie) => {
            info!("Credentials Updated");
            let jar = SignedCookieJar::new(state.cookie_key.clone()).add(cookie);
            (jar, response).into_response()
        }
        None => response,
    }
}
