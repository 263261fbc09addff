//! Authentication error types.
//!
//! Credential failures never reveal which part of the submission was
//! wrong: an unknown identifier and a wrong password both surface as
//! [`AuthError::InvalidCredentials`] with the same message. The full
//! cause is kept for the audit trail only.

use thiserror::Error;

use bms_session::SessionError;
use bms_store::StoreError;
use bms_token::TokenError;

/// Authentication operation errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Identifier unknown or password wrong. Deliberately vague.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The submitted TOTP code did not verify.
    #[error("invalid verification code")]
    InvalidMfaCode,

    /// No multi-factor challenge or enrollment is pending for the caller.
    #[error("no multi-factor challenge pending")]
    NoPendingMfa,

    /// The identifier is already registered.
    #[error("identifier already registered: {identifier}")]
    DuplicateIdentifier {
        /// The conflicting identifier, normalized.
        identifier: String,
    },

    /// The password does not meet the acceptance rules.
    #[error("password must be at least {min_length} characters")]
    WeakPassword {
        /// Minimum accepted length.
        min_length: usize,
    },

    /// The request is malformed in a way the caller can fix.
    #[error("{0}")]
    Validation(String),

    /// No credential was presented, or it resolved to nothing.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller is authenticated but the role is not admitted.
    #[error("access denied")]
    Forbidden,

    /// The bearer token is malformed or its signature is wrong.
    #[error("invalid token")]
    InvalidToken,

    /// The bearer token is past its expiry.
    #[error("token expired")]
    ExpiredToken,

    /// Too many attempts for this identifier within the window.
    #[error("too many attempts, retry in {retry_after_seconds}s")]
    TooManyAttempts {
        /// Seconds until the oldest attempt leaves the window.
        retry_after_seconds: u64,
    },

    /// The referenced principal does not exist.
    #[error("not found")]
    NotFound,

    /// The service is wired with an unusable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Internal error. Detail goes to tracing, not to the caller.
    #[error("internal error")]
    Internal(String),
}

impl AuthError {
    /// Returns `true` for failures that should surface as a missing or
    /// unusable credential (HTTP 401).
    #[must_use]
    pub const fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::Unauthenticated
                | Self::InvalidToken
                | Self::ExpiredToken
        )
    }

    /// Returns `true` if the failure is a role-based denial (HTTP 403).
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }

    /// Returns `true` for rate-limit rejections.
    #[must_use]
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::TooManyAttempts { .. })
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateIdentifier { identifier } => {
                Self::DuplicateIdentifier { identifier }
            }
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::ExpiredToken,
            TokenError::Invalid => Self::InvalidToken,
            TokenError::Signing(msg) => Self::Internal(msg),
        }
    }
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
