//! Session store error types.

use thiserror::Error;

/// Errors that can occur during session store operations.
///
/// The in-memory stores never fail, but distributed backings can.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Internal session store error.
    #[error("internal session store error: {0}")]
    Internal(String),
}

/// Result type for session store operations.
pub type SessionResult<T> = Result<T, SessionError>;
