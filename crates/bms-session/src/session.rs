//! Authenticated session model (session-cookie transport).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bms_model::Role;

/// A server-held authenticated session.
///
/// Keyed by an opaque random identifier handed to the client; all state
/// stays on the server. Expiry is absolute: a fixed TTL from creation,
/// not extended by activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    // === Identity ===
    /// Opaque session identifier (the client-side credential).
    pub id: String,
    /// Principal this session authenticates.
    pub principal_id: Uuid,
    /// Login identifier, normalized.
    pub identifier: String,
    /// Role snapshot at login time.
    pub role: Role,

    // === Authentication state ===
    /// Whether the second factor was verified for this session.
    ///
    /// Always true for principals whose role requires MFA; a session is
    /// only created once the login protocol completes.
    pub mfa_verified: bool,

    // === Timestamps ===
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a new session with a fresh random identifier.
    #[must_use]
    pub fn new(principal_id: Uuid, identifier: impl Into<String>, role: Role, ttl_seconds: i64) -> Self {
        let now = Utc::now();
        Self {
            id: bms_crypto::generate_session_id(),
            principal_id,
            identifier: identifier.into(),
            role,
            mfa_verified: false,
            created_at: now,
            expires_at: now + Duration::seconds(ttl_seconds),
        }
    }

    /// Marks the second factor as verified.
    #[must_use]
    pub const fn with_mfa_verified(mut self, verified: bool) -> Self {
        self.mfa_verified = verified;
        self
    }

    /// Checks whether the session has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns the session age in seconds.
    #[must_use]
    pub fn age_seconds(&self) -> i64 {
        (Utc::now() - self.created_at).num_seconds()
    }
}
