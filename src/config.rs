/*
 * Responsibility
 * - 環境変数の読み込み (AUTHCENTER, REDIS_URL, CROSS_KEY, COOKIE_SECRET など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum_extra::extract::cookie::Key;
use url::Url;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for AppError {
    fn from(_: ConfigError) -> Self {
        AppError::Internal
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // AUTHCENTER_LOCAL があればそちらを優先する
    pub authcenter_url: Url,

    // signed cookie (appKey) 用の鍵。64 bytes 以上
    pub cookie_key: Key,

    // vpc_access_only 用の共有鍵。未設定なら全リクエストを拒否する
    pub cross_key: Option<String>,

    pub redis_url: Option<String>,

    // 0 なら token cache 無効
    pub auth_cache_ttl_seconds: u64,

    pub body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material is intentionally not printable.
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("authcenter_url", &self.authcenter_url.as_str())
            .field("cross_key", &self.cross_key.as_ref().map(|_| "<redacted>"))
            .field("redis_url", &self.redis_url)
            .field("auth_cache_ttl_seconds", &self.auth_cache_ttl_seconds)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let authcenter = lookup("AUTHCENTER_LOCAL")
            .filter(|s| !s.trim().is_empty())
            .or_else(|| lookup("AUTHCENTER"))
            .ok_or(ConfigError::Missing("AUTHCENTER"))?;
        let authcenter_url =
            Url::parse(authcenter.trim()).map_err(|_| ConfigError::Invalid("AUTHCENTER"))?;

        let cookie_key = match lookup("COOKIE_SECRET") {
            Some(secret) => Key::try_from(secret.as_bytes())
                .map_err(|_| ConfigError::Invalid("COOKIE_SECRET"))?,
            None if app_env.is_production() => return Err(ConfigError::Missing("COOKIE_SECRET")),
            None => {
                tracing::warn!("COOKIE_SECRET not set, generating an ephemeral cookie key");
                Key::generate()
            }
        };

        let cross_key = lookup("CROSS_KEY").filter(|s| !s.is_empty());

        let redis_url = lookup("REDIS_URL").filter(|s| !s.trim().is_empty());

        let auth_cache_ttl_seconds = match lookup("AUTH_CACHE_TTL_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|_| ConfigError::Invalid("AUTH_CACHE_TTL_SECONDS"))?,
            None => 0,
        };

        let body_limit_bytes = lookup("BODY_LIMIT_BYTES")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let request_timeout_seconds = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            authcenter_url,
            cookie_key,
            cross_key,
            redis_url,
            auth_cache_ttl_seconds,
            body_limit_bytes,
            request_timeout_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn local_authcenter_overrides_configured_one() {
        let config = load(&[
            ("AUTHCENTER", "https://auth.example.com"),
            ("AUTHCENTER_LOCAL", "http://10.0.0.5:8000"),
        ])
        .unwrap();

        assert_eq!(config.authcenter_url.as_str(), "http://10.0.0.5:8000/");
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.request_timeout_seconds, 30);
    }

    #[test]
    fn authcenter_is_required() {
        assert!(matches!(
            load(&[("PORT", "8080")]),
            Err(ConfigError::Missing("AUTHCENTER"))
        ));
    }

    #[test]
    fn short_cookie_secret_is_rejected() {
        let res = load(&[
            ("AUTHCENTER", "https://auth.example.com"),
            ("COOKIE_SECRET", "too-short"),
        ]);
        assert!(matches!(res, Err(ConfigError::Invalid("COOKIE_SECRET"))));
    }

    #[test]
    fn production_requires_cookie_secret() {
        let res = load(&[
            ("AUTHCENTER", "https://auth.example.com"),
            ("APP_ENV", "production"),
        ]);
        assert!(matches!(res, Err(ConfigError::Missing("COOKIE_SECRET"))));

        let config = load(&[
            ("AUTHCENTER", "https://auth.example.com"),
            ("APP_ENV", "prod"),
            ("COOKIE_SECRET", SECRET),
            ("REDIS_URL", "redis://cache:6379/1"),
            ("AUTH_CACHE_TTL_SECONDS", "120"),
        ])
        .unwrap();
        assert!(config.app_env.is_production());
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379/1"));
        assert_eq!(config.auth_cache_ttl_seconds, 120);
        assert!(config.cross_key.is_none());
    }
}
