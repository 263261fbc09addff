//! In-memory session and pending-MFA stores.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::SessionResult;
use crate::pending::PendingMfa;
use crate::provider::{PendingMfaStore, SessionStore};
use crate::session::Session;

/// In-memory session store for development and testing.
///
/// For production with multiple instances, use a distributed store.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    /// Creates a new in-memory session store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, session: &Session) -> SessionResult<()> {
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    async fn remove(&self, session_id: &str) -> SessionResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }

    async fn remove_expired(&self) -> SessionResult<usize> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired());
        Ok(before - sessions.len())
    }

    async fn count(&self) -> SessionResult<usize> {
        Ok(self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired())
            .count())
    }
}

/// In-memory pending-MFA ticket store for development and testing.
pub struct InMemoryPendingMfaStore {
    tickets: RwLock<HashMap<String, PendingMfa>>,
}

impl InMemoryPendingMfaStore {
    /// Creates a new in-memory ticket store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPendingMfaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PendingMfaStore for InMemoryPendingMfaStore {
    async fn put(&self, pending: &PendingMfa) -> SessionResult<()> {
        self.tickets
            .write()
            .await
            .insert(pending.ticket.clone(), pending.clone());
        Ok(())
    }

    async fn get(&self, ticket: &str) -> SessionResult<Option<PendingMfa>> {
        Ok(self
            .tickets
            .read()
            .await
            .get(ticket)
            .filter(|p| !p.is_expired())
            .cloned())
    }

    async fn remove(&self, ticket: &str) -> SessionResult<()> {
        self.tickets.write().await.remove(ticket);
        Ok(())
    }

    async fn remove_expired(&self) -> SessionResult<usize> {
        let mut tickets = self.tickets.write().await;
        let before = tickets.len();
        tickets.retain(|_, p| !p.is_expired());
        Ok(before - tickets.len())
    }
}
