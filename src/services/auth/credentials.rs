//! Credential extraction from request headers and cookies.
//!
//! Every source is optional: a missing value, a value that fails percent
//! decoding, a bad signature or an undecodable app cookie is reported as
//! absent rather than as an error.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, Key, SameSite, SignedCookieJar};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::services::auth::identity::Identity;

/// Header carrying a bearer token for API clients.
pub const AUTH_TOKEN_HEADER: &str = "venidera-authtoken";
/// Cookie carrying the token for browser sessions.
pub const VAT_COOKIE: &str = "VAT";
/// Signed cookie caching the last resolved identity.
pub const APP_COOKIE: &str = "appKey";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credentials {
    pub header_token: Option<String>,
    pub cookie_token: Option<String>,
    pub app_cookie: Option<Identity>,
}

impl Credentials {
    pub fn from_headers(headers: &HeaderMap, key: &Key) -> Self {
        let header_token = headers
            .get(AUTH_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(unquote);

        // The jar already percent-decodes cookie values.
        let cookie_token = CookieJar::from_headers(headers)
            .get(VAT_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty());

        let app_cookie = SignedCookieJar::from_headers(headers, key.clone())
            .get(APP_COOKIE)
            .and_then(|c| decode_app_cookie(c.value()));

        Self {
            header_token,
            cookie_token,
            app_cookie,
        }
    }

    /// Token forwarded to the identity service. The header wins over the cookie.
    pub fn presented_token(&self) -> Option<&str> {
        self.header_token
            .as_deref()
            .or(self.cookie_token.as_deref())
    }
}

fn unquote(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    if decoded.is_empty() {
        return None;
    }
    Some(decoded.into_owned())
}

/// Build the (unsigned) app cookie holding `identity`.
///
/// The identity JSON is base64url-encoded so the cookie value stays within the
/// cookie-octet charset. Signing happens when the cookie is added to a
/// `SignedCookieJar`.
pub fn app_cookie(identity: &Identity, secure: bool) -> Option<Cookie<'static>> {
    let json = serde_json::to_vec(identity).ok()?;

    let cookie = Cookie::build((APP_COOKIE, URL_SAFE_NO_PAD.encode(json)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();

    Some(cookie)
}

fn decode_app_cookie(value: &str) -> Option<Identity> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderValue, header};
    use axum::response::IntoResponse;
    use serde_json::json;

    use super::*;

    fn identity(username: &str) -> Identity {
        Identity::try_from(json!({"username": username, "role": "Analyst"})).unwrap()
    }

    /// Sign `identity` with `key` and return the `appKey=<value>` pair a browser
    /// would send back.
    fn signed_app_cookie(key: &Key, identity: &Identity) -> String {
        let jar = SignedCookieJar::new(key.clone()).add(app_cookie(identity, false).unwrap());
        let res = (jar, ()).into_response();
        let raw = res.headers()[header::SET_COOKIE].to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn reads_all_three_sources() {
        let key = Key::generate();
        let ana = identity("ana");
        let cookie = signed_app_cookie(&key, &ana);

        let creds = Credentials::from_headers(
            &headers(&[
                ("Venidera-AuthToken", "abc%3D%3D"),
                ("cookie", &format!("VAT=cookie-token; {cookie}")),
            ]),
            &key,
        );

        assert_eq!(creds.header_token.as_deref(), Some("abc=="));
        assert_eq!(creds.cookie_token.as_deref(), Some("cookie-token"));
        assert_eq!(creds.app_cookie, Some(ana));
        assert_eq!(creds.presented_token(), Some("abc=="));
    }

    #[test]
    fn missing_sources_are_absent() {
        let creds = Credentials::from_headers(&HeaderMap::new(), &Key::generate());
        assert_eq!(creds, Credentials::default());
        assert_eq!(creds.presented_token(), None);
    }

    #[test]
    fn cookie_token_is_used_when_header_is_missing() {
        let creds = Credentials::from_headers(
            &headers(&[("cookie", "VAT=tok%20en")]),
            &Key::generate(),
        );
        assert_eq!(creds.presented_token(), Some("tok en"));
    }

    #[test]
    fn cookie_and_header_tokens_are_decoded_once() {
        let creds = Credentials::from_headers(
            &headers(&[
                ("Venidera-AuthToken", "abc%2541"),
                ("cookie", "VAT=abc%2541"),
            ]),
            &Key::generate(),
        );
        assert_eq!(creds.header_token.as_deref(), Some("abc%41"));
        assert_eq!(creds.cookie_token.as_deref(), Some("abc%41"));
    }

    #[test]
    fn malformed_values_are_treated_as_absent() {
        let key = Key::generate();
        let creds = Credentials::from_headers(
            &headers(&[
                // invalid UTF-8 after percent decoding
                ("Venidera-AuthToken", "%FF%FE"),
                ("cookie", "VAT=; appKey=not-signed-at-all"),
            ]),
            &key,
        );
        assert_eq!(creds, Credentials::default());
    }

    #[test]
    fn app_cookie_signed_with_another_key_is_ignored() {
        let cookie = signed_app_cookie(&Key::generate(), &identity("ana"));
        let creds = Credentials::from_headers(&headers(&[("cookie", &cookie)]), &Key::generate());
        assert!(creds.app_cookie.is_none());
    }
}
