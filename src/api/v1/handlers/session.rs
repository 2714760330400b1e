/*
 * Responsibility
 * - GET /me, /profile, /secure, /admin
 * - guard 済みの RequestCtx / CurrentUser を受け取って返すだけ
 */
use axum::Json;

use crate::api::v1::dto::session::{AdminResponse, SessionResponse};
use crate::api::v1::extractors::{CurrentUser, RequestCtx};

pub async fn me(ctx: RequestCtx) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: ctx.is_authenticated(),
        user: ctx.current_user,
    })
}

pub async fn admin(CurrentUser(user): CurrentUser) -> Json<AdminResponse> {
    Json(AdminResponse {
        status: "ok",
        username: user.username().map(str::to_string),
    })
}

pub async fn profile(CurrentUser(user): CurrentUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        user: Some(user),
    })
}
