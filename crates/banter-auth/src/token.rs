use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Claims carried inside a session token. The signed token is the only
/// place these exist — nothing is stored server-side, so validity is a
/// pure function of (token, current time, secret).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaim {
    /// The authenticated username.
    pub sub: String,
    /// Issued-at, Unix seconds.
    pub iat: i64,
    /// Expiry, Unix seconds. Always `iat` + the codec's TTL.
    pub exp: i64,
}

/// Signs and verifies session tokens (HS256 JWTs).
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenCodec {
    /// The secret and TTL are injected here at construction — never read
    /// from process-wide state further down.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            validation,
        }
    }

    /// Issue a signed token for `username`, expiring TTL from now.
    pub fn issue(&self, username: &str) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaim {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).context("signing session token")
    }

    /// Validate signature and expiry. Every failure mode — malformed
    /// token, wrong signature, expired claim — collapses into the one
    /// `InvalidToken` variant so nothing about the check leaks out.
    pub fn verify(&self, token: &str) -> Result<SessionClaim, AuthError> {
        decode::<SessionClaim>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new("test-secret", Duration::hours(2))
    }

    #[test]
    fn issue_verify_roundtrip() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        let claim = codec.verify(&token).unwrap();
        assert_eq!(claim.sub, "alice");
        assert_eq!(claim.exp, claim.iat + 2 * 60 * 60);
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice").unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        let flipped = if parts[1].starts_with('A') { "B" } else { "A" };
        parts[1].replace_range(0..1, flipped);
        let tampered = parts.join(".");

        assert_eq!(codec.verify(&tampered).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = codec().issue("alice").unwrap();
        let other = TokenCodec::new("other-secret", Duration::hours(2));
        assert_eq!(other.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn expired_token_is_rejected() {
        // A negative TTL puts the expiry in the past without sleeping.
        let codec = TokenCodec::new("test-secret", Duration::seconds(-5));
        let token = codec.issue("alice").unwrap();
        assert_eq!(codec.verify(&token).unwrap_err(), AuthError::InvalidToken);
    }

    #[test]
    fn malformed_tokens_fail_the_same_way() {
        let codec = codec();
        for garbage in ["", "not-a-token", "a.b.c", "only.two"] {
            assert_eq!(codec.verify(garbage).unwrap_err(), AuthError::InvalidToken);
        }
    }
}
