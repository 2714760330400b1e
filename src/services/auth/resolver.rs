//! Credential precedence resolution.
//!
//! Precedence:
//! 1. `Venidera-AuthToken` header alone (API clients)
//! 2. `VAT` cookie + signed `appKey` cookie (returning browser session)
//! 3. `VAT` cookie alone (first request of a browser session)
//!
//! Exactly one call to the identity service is made when a token is present,
//! none otherwise. Failures never surface as errors: the request simply stays
//! anonymous.

use std::sync::Arc;

use tracing::{info, warn};

use crate::services::auth::{
    credentials::Credentials,
    identity::Identity,
    validator::{TokenValidator, ValidationError},
};

/// Outcome of credential resolution for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub current_user: Option<Identity>,
    // token treated as authoritative for this request
    pub vat: Option<String>,
    // a token was presented but the identity service refused it
    pub token_invalid: bool,
    // `Some` when the app cookie must be (re)written with this identity
    pub refresh_app_cookie: Option<Identity>,
}

impl Resolution {
    fn anonymous() -> Self {
        Self::default()
    }
}

#[derive(Clone)]
pub struct CredentialResolver {
    validator: Arc<dyn TokenValidator>,
}

impl CredentialResolver {
    pub fn new(validator: Arc<dyn TokenValidator>) -> Self {
        Self { validator }
    }

    pub async fn resolve(&self, credentials: Credentials) -> Resolution {
        let Some(token) = credentials.presented_token() else {
            info!("No credentials found.");
            return Resolution::anonymous();
        };

        info!("Check Token");
        let checked = self.validator.validate(token).await;

        decide(credentials, checked)
    }
}

/// Apply the precedence table to the identity service outcome.
pub fn decide(
    credentials: Credentials,
    checked: Result<Identity, ValidationError>,
) -> Resolution {
    let checked = match checked {
        Ok(identity) => identity,
        Err(err) => {
            warn!(error = %err, "Token not valid... Authentication Failed");
            return Resolution {
                token_invalid: true,
                ..Resolution::anonymous()
            };
        }
    };

    let Credentials {
        header_token,
        cookie_token,
        app_cookie,
    } = credentials;

    match (header_token, cookie_token, app_cookie) {
        (Some(header), None, None) => {
            info!("Authentication type: TOKEN (header)");
            Resolution {
                current_user: Some(checked),
                vat: Some(header),
                ..Resolution::anonymous()
            }
        }
        (_, Some(cookie), None) => {
            info!("Authentication type: VAT (cookie) and no appkey");
            Resolution {
                current_user: Some(checked.clone()),
                vat: Some(cookie),
                refresh_app_cookie: Some(checked),
                ..Resolution::anonymous()
            }
        }
        (_, Some(cookie), Some(app_cookie)) => {
            info!("Authentication type: COOKIE (appkey)");
            // Reusing the cached identity keeps claims from an earlier request
            // until the username changes.
            if app_cookie.username() != checked.username() {
                Resolution {
                    current_user: Some(checked.clone()),
                    vat: Some(cookie),
                    refresh_app_cookie: Some(checked),
                    ..Resolution::anonymous()
                }
            } else {
                Resolution {
                    current_user: Some(app_cookie),
                    vat: Some(cookie),
                    ..Resolution::anonymous()
                }
            }
        }
        // header token next to an app cookie without a VAT cookie
        _ => {
            info!("Token valid but no matching credential combination");
            Resolution::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;

    fn identity(username: &str, role: &str) -> Identity {
        Identity::try_from(json!({"username": username, "role": role})).unwrap()
    }

    /// Records every token it sees and answers with a fixed outcome.
    struct FakeValidator {
        seen: Mutex<Vec<String>>,
        answer: Option<Identity>,
    }

    impl FakeValidator {
        fn accepting(identity: Identity) -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                answer: Some(identity),
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self {
                seen: Mutex::new(Vec::new()),
                answer: None,
            })
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenValidator for FakeValidator {
        async fn validate(&self, token: &str) -> Result<Identity, ValidationError> {
            self.seen.lock().unwrap().push(token.to_string());
            self.answer
                .clone()
                .ok_or(ValidationError::Rejected(reqwest::StatusCode::UNAUTHORIZED))
        }
    }

    fn creds(header: Option<&str>, cookie: Option<&str>, app: Option<Identity>) -> Credentials {
        Credentials {
            header_token: header.map(str::to_string),
            cookie_token: cookie.map(str::to_string),
            app_cookie: app,
        }
    }

    #[tokio::test]
    async fn no_token_means_no_remote_call() {
        let validator = FakeValidator::accepting(identity("ana", "Analyst"));
        let resolver = CredentialResolver::new(validator.clone());

        // an app cookie alone is not a credential
        let res = resolver
            .resolve(creds(None, None, Some(identity("ana", "Analyst"))))
            .await;

        assert_eq!(res, Resolution::default());
        assert!(validator.seen().is_empty());
    }

    #[tokio::test]
    async fn failed_validation_leaves_request_anonymous() {
        let combos = [
            creds(Some("h"), None, None),
            creds(None, Some("c"), None),
            creds(None, Some("c"), Some(identity("ana", "Analyst"))),
            creds(Some("h"), Some("c"), Some(identity("ana", "Analyst"))),
        ];

        for combo in combos {
            let validator = FakeValidator::rejecting();
            let res = CredentialResolver::new(validator.clone())
                .resolve(combo)
                .await;

            assert!(res.current_user.is_none());
            assert!(res.refresh_app_cookie.is_none());
            assert!(res.token_invalid);
            assert_eq!(validator.seen().len(), 1);
        }
    }

    #[tokio::test]
    async fn header_token_wins_for_the_remote_call() {
        let validator = FakeValidator::accepting(identity("ana", "Analyst"));
        let res = CredentialResolver::new(validator.clone())
            .resolve(creds(Some("from-header"), Some("from-cookie"), None))
            .await;

        assert_eq!(validator.seen(), vec!["from-header".to_string()]);
        // cookie branch: the cookie token stays authoritative
        assert_eq!(res.vat.as_deref(), Some("from-cookie"));
    }

    #[tokio::test]
    async fn header_only_sets_identity_without_cookie() {
        let fresh = identity("ana", "Analyst");
        let res = CredentialResolver::new(FakeValidator::accepting(fresh.clone()))
            .resolve(creds(Some("tok"), None, None))
            .await;

        assert_eq!(res.current_user, Some(fresh));
        assert_eq!(res.vat.as_deref(), Some("tok"));
        assert!(res.refresh_app_cookie.is_none());
        assert!(!res.token_invalid);
    }

    #[test]
    fn cookie_without_app_cookie_writes_app_cookie() {
        let fresh = identity("ana", "Analyst");
        let res = decide(creds(None, Some("vat"), None), Ok(fresh.clone()));

        assert_eq!(res.current_user, Some(fresh.clone()));
        assert_eq!(res.vat.as_deref(), Some("vat"));
        assert_eq!(res.refresh_app_cookie, Some(fresh));
    }

    #[test]
    fn mismatched_app_cookie_is_replaced() {
        let fresh = identity("bruno", "Analyst");
        let res = decide(
            creds(None, Some("vat"), Some(identity("ana", "Administrator"))),
            Ok(fresh.clone()),
        );

        assert_eq!(res.current_user, Some(fresh.clone()));
        assert_eq!(res.refresh_app_cookie, Some(fresh));
    }

    #[test]
    fn matching_app_cookie_is_kept_unchanged() {
        let cached = identity("ana", "Administrator");
        let res = decide(
            creds(None, Some("vat"), Some(cached.clone())),
            Ok(identity("ana", "Analyst")),
        );

        // the cached (possibly stale) role claim wins
        assert_eq!(res.current_user, Some(cached));
        assert!(res.refresh_app_cookie.is_none());
        assert_eq!(res.vat.as_deref(), Some("vat"));
    }

    #[test]
    fn header_with_app_cookie_but_no_vat_stays_anonymous() {
        let res = decide(
            creds(Some("tok"), None, Some(identity("ana", "Analyst"))),
            Ok(identity("ana", "Analyst")),
        );

        assert_eq!(res, Resolution::default());
    }
}
