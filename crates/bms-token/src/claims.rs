//! JWT claims carried by bearer tokens.

use bms_model::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BearerClaims {
    // === Standard JWT Claims (RFC 7519) ===
    /// Issuer.
    pub iss: String,

    /// Subject, the principal's id.
    pub sub: Uuid,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Issued at time (Unix timestamp).
    pub iat: i64,

    /// JWT ID, unique per issued token.
    pub jti: String,

    // === BMS Claims ===
    /// The principal's login identifier.
    pub identifier: String,

    /// The principal's role at issue time.
    pub role: Role,
}

impl BearerClaims {
    /// Creates new claims for a principal.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        subject: Uuid,
        identifier: impl Into<String>,
        role: Role,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            iss: issuer.into(),
            sub: subject,
            exp: expires_at.timestamp(),
            iat: Utc::now().timestamp(),
            jti: Uuid::now_v7().to_string(),
            identifier: identifier.into(),
            role,
        }
    }

    /// Returns the expiration time.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
