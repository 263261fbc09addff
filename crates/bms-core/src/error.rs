//! Shared error type for the BMS authentication core.
//!
//! Messages are written to be safe for end users: authentication and
//! authorization failures stay generic so that callers cannot probe which
//! part of a credential was wrong, and internal faults never leak detail.

use thiserror::Error;

/// Result type alias using the shared error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Shared error type for cross-cutting concerns.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Credential or session store error.
    #[error("store error: {0}")]
    Store(String),

    /// Authentication error.
    ///
    /// Deliberately generic: does not reveal whether the identifier or
    /// the password was wrong.
    #[error("authentication failed")]
    Authentication,

    /// Authorization error.
    #[error("access denied")]
    Authorization,

    /// Validation error.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal error. Detail goes to the log, never to the caller.
    #[error("internal error")]
    Internal,
}

impl Error {
    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Internal)
    }

    /// Returns whether this error represents a client error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Authentication | Self::Authorization | Self::Validation(_)
        )
    }
}
