use anyhow::Result;
use chrono::Duration;

use crate::error::AuthError;
use crate::token::TokenCodec;

/// Bridges transport-level credentials to an authenticated identity and
/// re-checks identity consistency on writes. Pure given a codec; safe to
/// share across requests without locking.
#[derive(Clone)]
pub struct SessionGate {
    codec: TokenCodec,
}

impl SessionGate {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Issue a fresh session token for a user whose credentials were
    /// already verified by the caller. Logout never revokes these — a
    /// token stays valid until its natural expiry.
    pub fn issue_session(&self, username: &str) -> Result<String> {
        self.codec.issue(username)
    }

    /// Resolve the session cookie value to an identity. A missing cookie
    /// and a failed verification are indistinguishable to the caller.
    pub fn authenticate(&self, cookie_value: Option<&str>) -> Result<String, AuthError> {
        let token = cookie_value.ok_or(AuthError::InvalidToken)?;
        Ok(self.codec.verify(token)?.sub)
    }

    /// A write must declare the same author the token was issued to,
    /// byte for byte.
    pub fn authorize_write(&self, claimed: &str, authenticated: &str) -> Result<(), AuthError> {
        if claimed == authenticated {
            Ok(())
        } else {
            Err(AuthError::IdentityMismatch)
        }
    }

    pub fn token_ttl(&self) -> Duration {
        self.codec.ttl()
    }
}
