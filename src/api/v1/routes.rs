/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - route group ごとに guard の順序付きリストを適用して merge する
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{health::health, internal, session};
use crate::middleware::guards::{self, Guard};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let session = guards::apply(
        Router::new().route("/me", get(session::me)),
        state,
        &[Guard::CheckCredentials],
    );

    let profile = guards::apply(
        Router::new().route("/profile", get(session::profile)),
        state,
        &[Guard::CheckCredentials, Guard::Authenticated],
    );

    let admin = guards::apply(
        Router::new().route("/admin", get(session::admin)),
        state,
        &[Guard::CheckCredentials, Guard::AdminOnly],
    );

    let secure = guards::apply(
        Router::new().route("/secure", get(session::profile)),
        state,
        &[
            Guard::HttpsRequired,
            Guard::CheckCredentials,
            Guard::Authenticated,
        ],
    );

    let internal_status = guards::apply(
        Router::new().route("/internal/status", get(internal::status)),
        state,
        &[Guard::VpcOnly],
    );

    let internal_store = guards::apply(
        Router::new().route("/internal/store", get(internal::store)),
        state,
        &[Guard::VpcOnly, Guard::StoreFacility],
    );

    public
        .merge(session)
        .merge(profile)
        .merge(admin)
        .merge(secure)
        .merge(internal_status)
        .merge(internal_store)
}
