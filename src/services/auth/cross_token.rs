//! Short-lived cross tokens for internal (VPC) callers.
//!
//! A cross token is an HS256 JWT signed with the shared `CROSS_KEY`, carrying
//! only its issue time. It is accepted while `iat + 10 minutes >= now`.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// How long a cross token stays valid after it was issued.
pub const CROSS_TOKEN_LIFETIME_SECONDS: i64 = 10 * 60;

#[derive(Debug, thiserror::Error)]
pub enum CrossTokenError {
    #[error("cross token signature or format invalid: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("cross token issue time out of range")]
    InvalidIat,
    #[error("cross token expired")]
    Expired,
}

#[derive(Debug, Serialize, Deserialize)]
struct CrossClaims {
    iat: i64,
}

/// Sign a cross token issued at `issued_at`.
pub fn mint(secret: &str, issued_at: DateTime<Utc>) -> Result<String, CrossTokenError> {
    let claims = CrossClaims {
        iat: issued_at.timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Check signature and age of `token` at time `now`.
pub fn verify(token: &str, secret: &str, now: DateTime<Utc>) -> Result<(), CrossTokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Lifetime is enforced below against `iat`, not via `exp`.
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<CrossClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    let issued_at =
        DateTime::<Utc>::from_timestamp(data.claims.iat, 0).ok_or(CrossTokenError::InvalidIat)?;

    if issued_at + Duration::seconds(CROSS_TOKEN_LIFETIME_SECONDS) >= now {
        Ok(())
    } else {
        Err(CrossTokenError::Expired)
    }
}
