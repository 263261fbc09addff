//! In-memory credential store.

use std::collections::HashMap;

use async_trait::async_trait;
use bms_model::{Principal, Role};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::provider::CredentialStore;

/// In-memory credential store for development and testing.
///
/// For production with multiple instances, back this trait with a
/// persistent store instead.
pub struct InMemoryCredentialStore {
    principals: RwLock<HashMap<Uuid, Principal>>,
}

impl InMemoryCredentialStore {
    /// Creates a new in-memory credential store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            principals: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the number of stored principals.
    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    /// Returns whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.principals.read().await.is_empty()
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, principal: &Principal) -> StoreResult<()> {
        let normalized = Principal::normalize_identifier(&principal.identifier);
        let mut principals = self.principals.write().await;

        if principals
            .values()
            .any(|p| Principal::normalize_identifier(&p.identifier) == normalized)
        {
            return Err(StoreError::duplicate_identifier(normalized));
        }

        principals.insert(principal.id, principal.clone());
        Ok(())
    }

    async fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Principal>> {
        let normalized = Principal::normalize_identifier(identifier);
        Ok(self
            .principals
            .read()
            .await
            .values()
            .find(|p| Principal::normalize_identifier(&p.identifier) == normalized)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Principal>> {
        Ok(self.principals.read().await.get(&id).cloned())
    }

    async fn set_mfa_secret(&self, id: Uuid, secret: Option<String>) -> StoreResult<()> {
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&id).ok_or(StoreError::not_found(id))?;
        principal.mfa_secret = secret;
        Ok(())
    }

    async fn set_mfa_enabled(&self, id: Uuid, enabled: bool) -> StoreResult<()> {
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&id).ok_or(StoreError::not_found(id))?;
        principal.mfa_enabled = enabled;
        Ok(())
    }

    async fn set_role(&self, id: Uuid, role: Role) -> StoreResult<()> {
        let mut principals = self.principals.write().await;
        let principal = principals.get_mut(&id).ok_or(StoreError::not_found(id))?;
        principal.role = role;
        Ok(())
    }

    async fn list(&self) -> StoreResult<Vec<Principal>> {
        let mut principals: Vec<_> = self.principals.read().await.values().cloned().collect();
        principals.sort_by_key(|p| p.created_at);
        Ok(principals)
    }
}
