//! Key-value store interface exposed to handlers and to the token cache.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer errors (transport/command).
///
/// Note:
/// - Kept independent from `AppError` so callers decide how to fail
///   (fail-open for the token cache, 503 for handlers).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    BackendConnection(String),
    #[error("store command error: {0}")]
    BackendCommand(String),
}

/// A minimal string-based store interface.
///
/// Implementations must be cheap to clone (typically `Arc<...>` inside).
#[async_trait]
pub trait StoreClient: Clone + Send + Sync + 'static {
    // Returns the store backend name (for logging).
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;

    // Get UTF-8 string value.
    async fn get_string(&self, key: &str) -> StoreResult<Option<String>>;

    // Set value with TTL, overwriting any previous value.
    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()>;
}
