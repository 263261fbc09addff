//! Principal domain model.
//!
//! A principal is an identity known to the credential store. It carries the
//! password hash, the role used for authorization, and the MFA enrollment
//! state consulted by the login state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// An identity with an associated role.
///
/// The password hash and the TOTP secret are write-only with respect to
/// serialization: the secret leaves the core exactly once, at enrollment,
/// before it is confirmed onto this record. `Debug` redacts both.
#[derive(Clone, Serialize, Deserialize)]
pub struct Principal {
    // === Identity ===
    /// Unique identifier.
    pub id: Uuid,
    /// Login identifier (email or username), stored normalized.
    pub identifier: String,

    // === Credentials ===
    /// Salted one-way password hash in PHC string format.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    // === Authorization ===
    /// Role used for access-control decisions.
    pub role: Role,

    // === MFA enrollment ===
    /// Whether a second factor has been enrolled and confirmed.
    pub mfa_enabled: bool,
    /// Base32-encoded TOTP secret, present only once enrolled.
    #[serde(skip_serializing, default)]
    pub mfa_secret: Option<String>,

    // === Timestamps ===
    /// When the principal was created.
    pub created_at: DateTime<Utc>,
}

impl Principal {
    /// Creates a new principal with no MFA enrollment.
    ///
    /// The identifier is normalized before storage; callers pass the raw
    /// form, the store indexes the normalized one.
    #[must_use]
    pub fn new(identifier: impl Into<String>, password_hash: impl Into<String>, role: Role) -> Self {
        Self {
            id: Uuid::now_v7(),
            identifier: Self::normalize_identifier(&identifier.into()),
            password_hash: password_hash.into(),
            role,
            mfa_enabled: false,
            mfa_secret: None,
            created_at: Utc::now(),
        }
    }

    /// Sets the role.
    #[must_use]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets a confirmed MFA secret.
    #[must_use]
    pub fn with_mfa_secret(mut self, secret: impl Into<String>) -> Self {
        self.mfa_secret = Some(secret.into());
        self.mfa_enabled = true;
        self
    }

    /// Normalizes a login identifier for storage and lookup.
    ///
    /// Email-like identifiers (containing `@`) compare case-insensitively,
    /// so they are lowercased; plain usernames keep their case.
    #[must_use]
    pub fn normalize_identifier(raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.contains('@') {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }

    /// Checks whether this principal has a confirmed MFA enrollment.
    #[must_use]
    pub const fn is_mfa_enrolled(&self) -> bool {
        self.mfa_enabled && self.mfa_secret.is_some()
    }
}

impl std::fmt::Debug for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Principal")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .field("mfa_enabled", &self.mfa_enabled)
            .field("mfa_secret", &self.mfa_secret.as_ref().map(|_| "[REDACTED]"))
            .field("created_at", &self.created_at)
            .finish()
    }
}
