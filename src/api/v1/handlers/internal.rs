/*
 * Responsibility
 * - GET /internal/status, /internal/store (VPC 内部からのみ)
 * - store handle は init_store_facility が extensions に入れたものを使う
 */
use axum::{Extension, Json};
use serde_json::{Value, json};

use crate::error::AppError;
use crate::services::store::{StoreClient, StoreHandle};

pub async fn status() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

pub async fn store(Extension(store): Extension<StoreHandle>) -> Result<Json<Value>, AppError> {
    store.ping().await?;

    Ok(Json(json!({
        "status": "ok",
        "backend": store.backend_name(),
        "url_configured": store.is_url_configured(),
    })))
}
