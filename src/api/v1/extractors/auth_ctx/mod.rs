/*!
 * Request context extractors
 *
 * Responsibility:
 * - check_credentials が解決したコンテキスト（RequestCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - RequestCtx
 * - CurrentUser
 */

mod core;
mod types;

pub use core::CurrentUser;
pub use types::RequestCtx;
