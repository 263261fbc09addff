//! Credential store provider trait.

use async_trait::async_trait;
use bms_model::{Principal, Role};
use uuid::Uuid;

use crate::error::StoreResult;

/// Provider for principal storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
/// Identifier lookups are case-insensitive for email-like identifiers;
/// implementations index the normalized form
/// ([`Principal::normalize_identifier`]).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Creates a new principal.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::DuplicateIdentifier` if a principal with the
    /// same normalized identifier exists.
    async fn create(&self, principal: &Principal) -> StoreResult<()>;

    /// Gets a principal by login identifier.
    async fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Principal>>;

    /// Gets a principal by ID.
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>>;

    /// Sets or clears the stored MFA secret.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the principal doesn't exist.
    async fn set_mfa_secret(&self, id: Uuid, secret: Option<String>) -> StoreResult<()>;

    /// Sets the MFA-enabled flag.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the principal doesn't exist.
    async fn set_mfa_enabled(&self, id: Uuid, enabled: bool) -> StoreResult<()>;

    /// Changes the principal's role.
    ///
    /// ## Errors
    ///
    /// Returns `StoreError::NotFound` if the principal doesn't exist.
    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<()>;

    /// Lists all principals.
    async fn list(&self) -> StoreResult<Vec<Principal>>;
}
