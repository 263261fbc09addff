//! Pending-MFA ticket model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pending-MFA ticket.
///
/// Exists only between the password step and the code step of a login.
/// Keyed per login attempt, never per principal, so two racing logins for
/// the same account cannot observe each other's state. Single use:
/// consumed on success, expired by TTL otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingMfa {
    /// Opaque ticket identifier handed back to the caller.
    pub ticket: String,
    /// Principal that passed the password check.
    pub principal_id: Uuid,
    /// When the ticket was issued.
    pub created_at: DateTime<Utc>,
    /// When the ticket expires.
    pub expires_at: DateTime<Utc>,
}

impl PendingMfa {
    /// Creates a new ticket with a fresh random identifier.
    #[must_use]
    pub fn new(principal_id: Uuid, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            ticket: bms_crypto::generate_ticket_id(),
            principal_id,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }

    /// Checks whether the ticket has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns the ticket age in seconds.
    #[must_use]
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}
