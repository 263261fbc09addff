//! Session and pending-MFA store provider traits.

use async_trait::async_trait;

use crate::error::SessionResult;
use crate::pending::PendingMfa;
use crate::session::Session;

/// Provider for authenticated session storage.
///
/// Implementations must be thread-safe. Expired sessions are treated as
/// absent by `get`; `remove_expired` reclaims their storage.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session.
    async fn create(&self, session: &Session) -> SessionResult<()>;

    /// Gets a session by identifier. Expired or unknown identifiers
    /// yield `None`.
    async fn get(&self, session_id: &str) -> SessionResult<Option<Session>>;

    /// Removes (destroys) a session. Removing an unknown identifier is
    /// not an error.
    async fn remove(&self, session_id: &str) -> SessionResult<()>;

    /// Removes all expired sessions, returning how many were removed.
    async fn remove_expired(&self) -> SessionResult<usize>;

    /// Counts live (unexpired) sessions.
    async fn count(&self) -> SessionResult<usize>;
}

/// Provider for pending-MFA ticket storage.
///
/// Tickets are single-use: the issuer stores one per login attempt, the
/// verifier removes it on success. Expired tickets are treated as absent.
#[async_trait]
pub trait PendingMfaStore: Send + Sync {
    /// Stores a new ticket.
    async fn put(&self, pending: &PendingMfa) -> SessionResult<()>;

    /// Gets a ticket. Expired or unknown tickets yield `None`.
    async fn get(&self, ticket: &str) -> SessionResult<Option<PendingMfa>>;

    /// Removes a ticket (consumed on success or abandoned).
    async fn remove(&self, ticket: &str) -> SessionResult<()>;

    /// Removes all expired tickets, returning how many were removed.
    async fn remove_expired(&self) -> SessionResult<usize>;
}
