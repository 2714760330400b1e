//! Remote token validation against the identity service (`/auth/crosslogin`).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::services::auth::identity::Identity;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("token rejected by identity service (status {0})")]
    Rejected(StatusCode),
    #[error("unexpected identity payload")]
    InvalidPayload,
    #[error("invalid identity service url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Validates an opaque token and returns the identity it belongs to.
///
/// Implementations are called at most once per request.
#[async_trait]
pub trait TokenValidator: Send + Sync + 'static {
    async fn validate(&self, token: &str) -> Result<Identity, ValidationError>;
}

#[derive(Debug, Deserialize)]
struct CrossLoginResponse {
    data: serde_json::Value,
}

/// `POST {base}/auth/crosslogin` with `{"token": ...}`.
///
/// Success is HTTP 200 with `{"data": {<identity>}}`; anything else is a
/// validation failure. No explicit timeout: the client default applies.
#[derive(Debug, Clone)]
pub struct HttpTokenValidator {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTokenValidator {
    pub fn new(base_url: &Url) -> Result<Self, ValidationError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &Url) -> Result<Self, ValidationError> {
        Ok(Self {
            client,
            endpoint: crosslogin_url(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Appends `/auth/crosslogin` to the base url, keeping any path prefix.
fn crosslogin_url(base: &Url) -> Result<Url, url::ParseError> {
    let raw = format!("{}/auth/crosslogin", base.as_str().trim_end_matches('/'));
    Url::parse(&raw)
}

#[async_trait]
impl TokenValidator for HttpTokenValidator {
    async fn validate(&self, token: &str) -> Result<Identity, ValidationError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "token": token }))
            .send()
            .await?;

        if response.status() != StatusCode::OK {
            return Err(ValidationError::Rejected(response.status()));
        }

        let body: CrossLoginResponse = response
            .json()
            .await
            .map_err(|_| ValidationError::InvalidPayload)?;

        Identity::try_from(body.data).map_err(|_| ValidationError::InvalidPayload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crosslogin_url_keeps_prefix() {
        let base = Url::parse("http://authcenter.internal:8000/api/").unwrap();
        assert_eq!(
            crosslogin_url(&base).unwrap().as_str(),
            "http://authcenter.internal:8000/api/auth/crosslogin"
        );

        let base = Url::parse("https://auth.example.com").unwrap();
        assert_eq!(
            crosslogin_url(&base).unwrap().as_str(),
            "https://auth.example.com/auth/crosslogin"
        );
    }
}
