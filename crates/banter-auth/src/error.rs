use thiserror::Error;

/// Authentication and authorization failures. The display strings are
/// the exact user-facing bodies; internal detail never rides on these
/// variants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Login password did not match the stored hash.
    #[error("Invalid password.")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired session token. A single
    /// variant on purpose: callers cannot tell which check failed.
    #[error("Not authenticated.")]
    InvalidToken,

    /// A write declared an author that differs from the token identity.
    #[error("Claimed id and token id are different.")]
    IdentityMismatch,
}
