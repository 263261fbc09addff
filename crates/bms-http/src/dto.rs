//! Request and response bodies for the authentication API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bms_auth::{IssuedCredential, LoginOutcome, MfaEnrollment};
use bms_core::config::TransportKind;
use bms_model::{Principal, Role};

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Login identifier (email addresses compare case-insensitively).
    pub identifier: String,
    /// Plaintext password, hashed before storage.
    pub password: String,
    /// Role to assign. Defaults to the lowest role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Request to log in with a password.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login identifier.
    pub identifier: String,
    /// Plaintext password.
    pub password: String,
}

/// Request to complete a pending MFA challenge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaLoginRequest {
    /// Ticket returned by the password phase.
    pub ticket: String,
    /// Current TOTP code.
    pub code: String,
}

/// Request to confirm an MFA enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmMfaRequest {
    /// The candidate secret from the enrollment response.
    pub secret: String,
    /// Current TOTP code proving possession of the secret.
    pub code: String,
}

/// Request to change a principal's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    /// The new role.
    pub role: Role,
}

/// Response to a login attempt that did not fail.
///
/// Exactly one shape is populated: a credential, a challenge ticket, or
/// a credential flagged with `mfa_enrollment_required`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Issued credential, absent while a challenge is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Seconds until the credential expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
    /// Which transport issued the credential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportKind>,
    /// Set when a TOTP code must be presented next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_required: Option<bool>,
    /// Single-use ticket for the MFA phase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    /// Set when policy demands a second factor that is not enrolled yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfa_enrollment_required: Option<bool>,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        let empty = Self {
            token: None,
            expires_in_seconds: None,
            transport: None,
            mfa_required: None,
            ticket: None,
            mfa_enrollment_required: None,
        };

        match outcome {
            LoginOutcome::Authenticated { credential } => Self {
                token: Some(credential.token),
                expires_in_seconds: Some(credential.expires_in_seconds),
                transport: Some(credential.kind),
                ..empty
            },
            LoginOutcome::MfaRequired { ticket } => Self {
                mfa_required: Some(true),
                ticket: Some(ticket),
                ..empty
            },
            LoginOutcome::MfaEnrollmentRequired { credential } => Self {
                token: Some(credential.token),
                expires_in_seconds: Some(credential.expires_in_seconds),
                transport: Some(credential.kind),
                mfa_enrollment_required: Some(true),
                ..empty
            },
        }
    }
}

/// An issued credential, returned after MFA completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialResponse {
    /// The credential to present on subsequent requests.
    pub token: String,
    /// Seconds until it expires.
    pub expires_in_seconds: i64,
    /// Which transport issued it.
    pub transport: TransportKind,
}

impl From<IssuedCredential> for CredentialResponse {
    fn from(credential: IssuedCredential) -> Self {
        Self {
            token: credential.token,
            expires_in_seconds: credential.expires_in_seconds,
            transport: credential.kind,
        }
    }
}

/// A principal as exposed over the API. Never carries credential
/// material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    /// Stable unique id.
    pub id: Uuid,
    /// Login identifier.
    pub identifier: String,
    /// Assigned role.
    pub role: Role,
    /// Whether a confirmed second factor is active.
    pub mfa_enabled: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<Principal> for PrincipalResponse {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            identifier: principal.identifier,
            role: principal.role,
            mfa_enabled: principal.mfa_enabled,
            created_at: principal.created_at,
        }
    }
}

/// A fresh MFA enrollment offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    /// Base32 secret for manual entry into an authenticator app.
    pub secret: String,
    /// `otpauth://` URI for QR provisioning.
    pub provisioning_uri: String,
}

impl From<MfaEnrollment> for EnrollmentResponse {
    fn from(enrollment: MfaEnrollment) -> Self {
        Self {
            secret: enrollment.secret,
            provisioning_uri: enrollment.provisioning_uri,
        }
    }
}
