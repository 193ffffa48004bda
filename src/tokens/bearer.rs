//! Signed, self-contained bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the subject, issue time and expiry. There is
//! no server-side session table: a token is valid exactly when its signature
//! verifies under the configured secret and the current time is before its
//! expiry. Rotating the secret invalidates every outstanding token, and a
//! token cannot be revoked before it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Token invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by every bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Expiry (Unix seconds). The token is rejected at and after this instant.
    pub exp: i64,
    /// Issued-at (Unix seconds)
    pub iat: i64,
    /// Username the token was issued to
    pub sub: String,
}

/// An issued token together with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub expires_at: DateTime<Utc>,
    pub token: String,
}

/// Issues and verifies bearer tokens.
///
/// Holds no mutable state, so a single instance can be shared across all
/// request tasks and verification runs fully in parallel.
#[derive(Clone)]
pub struct TokenService {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked in `verify_at` against an explicit clock, with no leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            ttl: Duration::try_seconds(i64::try_from(config.ttl_seconds).unwrap_or(i64::MAX))
                .unwrap_or(Duration::MAX),
            validation,
        }
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let claims = Claims {
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            sub: subject.to_string(),
        };

        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(TokenError::Signing)?;

        Ok(IssuedToken { expires_at, token })
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(TokenError::Invalid)?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims.sub)
    }
}
