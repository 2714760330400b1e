/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - resolver: CredentialResolver, cookie_key, cross_key, store: StoreFacility
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - リクエスト単位の状態 (current_user など) はここに置かない → RequestCtx
 */
use std::sync::Arc;

use axum_extra::extract::cookie::Key;

use crate::services::{auth::CredentialResolver, store::StoreFacility};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<CredentialResolver>,
    pub cookie_key: Key,
    // `Secure` 属性付きで appKey を発行するか
    pub secure_cookies: bool,
    pub cross_key: Option<Arc<str>>,
    pub store: StoreFacility,
}

impl AppState {
    pub fn new(
        resolver: Arc<CredentialResolver>,
        cookie_key: Key,
        secure_cookies: bool,
        cross_key: Option<String>,
        store: StoreFacility,
    ) -> Self {
        Self {
            resolver,
            cookie_key,
            secure_cookies,
            cross_key: cross_key.map(Arc::from),
            store,
        }
    }
}
