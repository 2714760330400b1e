use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::Identity;

use super::RequestCtx;

/// Handler で RequestCtx を受け取るための extractor
/// check_credentials が走っていない場合は匿名として扱う
impl<S> FromRequestParts<S> for RequestCtx
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestCtx>()
            .cloned()
            .unwrap_or_default())
    }
}

/// 認証済みユーザーを受け取るための extractor
/// 見つからない場合は 401 を返す（匿名・ミドルウェア未設定）
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestCtx>()
            .and_then(|ctx| ctx.current_user.clone())
            .map(CurrentUser)
            .ok_or_else(|| AppError::unauthorized("Authentication required."))
    }
}
