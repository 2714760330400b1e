use std::{sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::services::{
    auth::{
        identity::Identity,
        validator::{TokenValidator, ValidationError},
    },
    store::StoreClient,
};

/// Validator that remembers validated tokens in the store.
///
/// A hit skips the identity service; a miss delegates to `inner` and stores the
/// identity JSON with the configured TTL. Store failures are logged and the
/// call falls through to `inner` (the cache never decides authentication).
#[derive(Clone)]
pub struct CachedValidator<S: StoreClient> {
    inner: Arc<dyn TokenValidator>,
    store: S,
    ttl: Duration,
    prefix: &'static str,
}

impl<S: StoreClient> CachedValidator<S> {
    pub fn new(inner: Arc<dyn TokenValidator>, store: S, ttl: Duration) -> Self {
        Self {
            inner,
            store,
            ttl,
            prefix: "authtoken",
        }
    }

    fn key(&self, token: &str) -> String {
        format!("{}:{}", self.prefix, token)
    }

    async fn lookup(&self, key: &str) -> Option<Identity> {
        match self.store.get_string(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "discarding undecodable cached identity");
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    backend = self.store.backend_name(),
                    error = %err,
                    "token cache lookup failed"
                );
                None
            }
        }
    }
}

#[async_trait]
impl<S: StoreClient> TokenValidator for CachedValidator<S> {
    async fn validate(&self, token: &str) -> Result<Identity, ValidationError> {
        let key = self.key(token);

        if let Some(identity) = self.lookup(&key).await {
            tracing::debug!("token found in cache");
            return Ok(identity);
        }

        let identity = self.inner.validate(token).await?;

        match serde_json::to_string(&identity) {
            Ok(raw) => {
                if let Err(err) = self.store.set_with_ttl(&key, &raw, self.ttl).await {
                    tracing::warn!(
                        backend = self.store.backend_name(),
                        error = %err,
                        "token cache store failed"
                    );
                }
            }
            Err(err) => tracing::warn!(error = %err, "identity not serializable"),
        }

        Ok(identity)
    }
}
