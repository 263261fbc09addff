//! Credential store error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during credential store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A principal with the same identifier already exists.
    ///
    /// Identifier comparison is case-insensitive for email-like
    /// identifiers.
    #[error("identifier already registered: {identifier}")]
    DuplicateIdentifier {
        /// The conflicting identifier, normalized.
        identifier: String,
    },

    /// Principal not found.
    #[error("principal not found: {id}")]
    NotFound {
        /// Principal ID.
        id: Uuid,
    },

    /// Internal store error.
    #[error("internal store error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a duplicate identifier error.
    #[must_use]
    pub fn duplicate_identifier(identifier: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            identifier: identifier.into(),
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub const fn not_found(id: Uuid) -> Self {
        Self::NotFound { id }
    }

    /// Checks if this is a duplicate identifier error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateIdentifier { .. })
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for credential store operations.
pub type StoreResult<T> = Result<T, StoreError>;
