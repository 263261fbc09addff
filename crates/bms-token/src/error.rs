//! Token error types.

use thiserror::Error;

/// Errors from token issuance and validation.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token is malformed, has a bad signature, or carries
    /// unacceptable claims.
    #[error("invalid token")]
    Invalid,

    /// The token is well formed but past its expiry.
    #[error("token expired")]
    Expired,

    /// Token signing failed.
    #[error("token signing failed: {0}")]
    Signing(String),
}

impl TokenError {
    /// Returns `true` if the token was rejected because it expired.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
