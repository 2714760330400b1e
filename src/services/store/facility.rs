use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tokio::sync::OnceCell;

use crate::services::store::client::{StoreClient, StoreError, StoreResult};

/// Used when `REDIS_URL` is not configured (local default instance, db 0).
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";

/// Process-wide store facility.
///
/// Holds the configured client; the connection manager is created on first
/// use and then shared by every request. Pooling and reconnection are left to
/// `redis::aio::ConnectionManager`.
#[derive(Clone, Debug)]
pub struct StoreFacility {
    inner: Arc<FacilityInner>,
}

#[derive(Debug)]
struct FacilityInner {
    client: redis::Client,
    from_url: bool,
    manager: OnceCell<redis::aio::ConnectionManager>,
}

impl StoreFacility {
    /// `Some(url)` builds a URL-configured client, `None` the default one.
    pub fn new(redis_url: Option<&str>) -> Result<Self, StoreError> {
        let (url, from_url) = match redis_url {
            Some(url) => (url, true),
            None => (DEFAULT_REDIS_URL, false),
        };

        let client =
            redis::Client::open(url).map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(FacilityInner {
                client,
                from_url,
                manager: OnceCell::new(),
            }),
        })
    }

    /// True when the facility was configured from `REDIS_URL`.
    pub fn is_url_configured(&self) -> bool {
        self.inner.from_url
    }

    /// Handle attached to a single request.
    pub fn handle(&self) -> StoreHandle {
        StoreHandle {
            facility: self.clone(),
        }
    }

    async fn connection(&self) -> StoreResult<redis::aio::ConnectionManager> {
        let manager = self
            .inner
            .manager
            .get_or_try_init(|| async {
                tracing::info!(
                    url_configured = self.inner.from_url,
                    "connecting to store"
                );
                self.inner.client.get_connection_manager().await
            })
            .await
            .map_err(|e| StoreError::BackendConnection(e.to_string()))?;

        // Use a clone of the connection manager
        Ok(manager.clone())
    }
}

/// Redis-backed store handle inserted into request extensions.
#[derive(Clone, Debug)]
pub struct StoreHandle {
    facility: StoreFacility,
}

impl StoreHandle {
    pub fn is_url_configured(&self) -> bool {
        self.facility.is_url_configured()
    }
}

#[async_trait]
impl StoreClient for StoreHandle {
    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> StoreResult<()> {
        let mut conn = self.facility.connection().await?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(())
    }

    async fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.facility.connection().await?;

        let resp: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(resp)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> StoreResult<()> {
        let mut conn = self.facility.connection().await?;

        // EX expects integer seconds. We clamp to at least 1 sec.
        let ttl_seconds: u64 = ttl.as_secs().max(1);

        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::BackendCommand(e.to_string()))?;

        Ok(())
    }
}
