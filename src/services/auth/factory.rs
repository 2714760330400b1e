/// Factory: build the `CredentialResolver` from application `Config`.
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{
    CredentialResolver, HttpTokenValidator, TokenValidator, token_cache::CachedValidator,
};
use crate::services::store::StoreFacility;

pub fn build_resolver(
    config: &Config,
    store: &StoreFacility,
) -> Result<Arc<CredentialResolver>, AppError> {
    let http = HttpTokenValidator::new(&config.authcenter_url).map_err(|err| {
        tracing::error!(error = %err, "invalid identity service url");
        AppError::Internal
    })?;

    tracing::info!(endpoint = %http.endpoint(), "identity service configured");

    let validator: Arc<dyn TokenValidator> = if config.auth_cache_ttl_seconds > 0 {
        Arc::new(CachedValidator::new(
            Arc::new(http),
            store.handle(),
            Duration::from_secs(config.auth_cache_ttl_seconds),
        ))
    } else {
        Arc::new(http)
    };

    Ok(Arc::new(CredentialResolver::new(validator)))
}
