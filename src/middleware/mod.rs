/*
 * Responsibility
 * - middleware の公開インターフェース (re-export)
 * - guards::apply(...) で guard の順序付きリストを Router に適用する
 */
pub mod auth;
pub mod guards;
pub mod http;
pub mod store;

pub use guards::Guard;
