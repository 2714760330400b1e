/*
 * Responsibility
 * - Handler から見える「リクエスト単位の認証コンテキスト」の型
 * - check_credentials middleware が解決して request extensions に格納する
 *
 * Notes
 * - token 検証ロジックは services::auth 側の責務
 * - gate (api_authenticated / allow_admin) はこの型だけを見る
 */

use crate::services::auth::{Identity, Resolution};

/// 認証済み (または匿名) リクエストに付与されるコンテキスト
///
/// - `current_user` は identity service の検証結果、または appKey cookie から復元した Identity
/// - `vat` はこのリクエストで正とみなした token
/// - `token_invalid` は token が渡されたが検証に失敗したことを示す (401 メッセージの出し分け用)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestCtx {
    pub current_user: Option<Identity>,
    pub vat: Option<String>,
    pub token_invalid: bool,
}

impl RequestCtx {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

impl From<&Resolution> for RequestCtx {
    fn from(res: &Resolution) -> Self {
        Self {
            current_user: res.current_user.clone(),
            vat: res.vat.clone(),
            token_invalid: res.token_invalid,
        }
    }
}
