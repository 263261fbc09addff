//! Login flow state machine.
//!
//! Type-safe state machine for the login sequence, ensuring valid
//! transitions at compile time. A flow moves Anonymous →
//! PasswordPending → (MfaPending) → Authenticated; every failure lands
//! in Failed and surfaces nothing about which check broke.
//!
//! The MfaPending state spans two requests. Between them it is carried
//! by a stored pending-MFA ticket, from which [`LoginFlow::resume_mfa`]
//! reconstructs the flow.

use std::marker::PhantomData;

use uuid::Uuid;

use bms_model::Role;

use crate::error::{AuthError, AuthResult};

/// Login flow states.
pub mod states {
    /// Nothing submitted yet.
    #[derive(Debug, Clone, Copy)]
    pub struct Anonymous;

    /// Credentials submitted, password being verified.
    #[derive(Debug, Clone, Copy)]
    pub struct PasswordPending;

    /// Password accepted, waiting for a TOTP code.
    #[derive(Debug, Clone, Copy)]
    pub struct MfaPending;

    /// Fully authenticated.
    #[derive(Debug, Clone, Copy)]
    pub struct Authenticated;

    /// Terminal failure.
    #[derive(Debug, Clone, Copy)]
    pub struct Failed;
}

/// Login flow context.
///
/// The generic parameter `S` is the current state, so invalid
/// transitions do not compile.
#[derive(Debug)]
pub struct LoginFlow<S> {
    /// Normalized identifier the flow was started with.
    identifier: String,
    /// Principal ID (set once the password verifies).
    principal_id: Option<Uuid>,
    /// Principal role (set once the password verifies).
    role: Option<Role>,
    /// Failure cause (for the failed state).
    error: Option<AuthError>,
    _state: PhantomData<S>,
}

impl<S> LoginFlow<S> {
    /// Returns the identifier this flow was started with.
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl LoginFlow<states::Anonymous> {
    /// Starts a new login flow for a normalized identifier.
    #[must_use]
    pub fn begin(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            principal_id: None,
            role: None,
            error: None,
            _state: PhantomData,
        }
    }

    /// Credentials submitted, move to password verification.
    #[must_use]
    pub fn submit_password(self) -> LoginFlow<states::PasswordPending> {
        LoginFlow {
            identifier: self.identifier,
            principal_id: None,
            role: None,
            error: None,
            _state: PhantomData,
        }
    }
}

impl LoginFlow<states::PasswordPending> {
    /// Password verified; branch on whether a second factor is needed.
    #[must_use]
    pub fn password_verified(
        self,
        principal_id: Uuid,
        role: Role,
        mfa_challenge: bool,
    ) -> PasswordVerified {
        if mfa_challenge {
            PasswordVerified::MfaPending(LoginFlow {
                identifier: self.identifier,
                principal_id: Some(principal_id),
                role: Some(role),
                error: None,
                _state: PhantomData,
            })
        } else {
            PasswordVerified::Authenticated(LoginFlow {
                identifier: self.identifier,
                principal_id: Some(principal_id),
                role: Some(role),
                error: None,
                _state: PhantomData,
            })
        }
    }

    /// Lookup failed or password mismatched.
    #[must_use]
    pub fn rejected(self, error: AuthError) -> LoginFlow<states::Failed> {
        LoginFlow {
            identifier: self.identifier,
            principal_id: None,
            role: None,
            error: Some(error),
            _state: PhantomData,
        }
    }
}

impl LoginFlow<states::MfaPending> {
    /// Reconstructs an MFA-pending flow from a stored ticket.
    #[must_use]
    pub fn resume_mfa(identifier: impl Into<String>, principal_id: Uuid, role: Role) -> Self {
        Self {
            identifier: identifier.into(),
            principal_id: Some(principal_id),
            role: Some(role),
            error: None,
            _state: PhantomData,
        }
    }

    /// TOTP code accepted.
    #[must_use]
    pub fn code_accepted(self) -> LoginFlow<states::Authenticated> {
        LoginFlow {
            identifier: self.identifier,
            principal_id: self.principal_id,
            role: self.role,
            error: None,
            _state: PhantomData,
        }
    }

    /// TOTP code rejected.
    #[must_use]
    pub fn code_rejected(self, error: AuthError) -> LoginFlow<states::Failed> {
        LoginFlow {
            identifier: self.identifier,
            principal_id: self.principal_id,
            role: self.role,
            error: Some(error),
            _state: PhantomData,
        }
    }

    /// The principal this challenge is for.
    #[must_use]
    pub const fn principal_id(&self) -> Option<Uuid> {
        self.principal_id
    }
}

impl LoginFlow<states::Authenticated> {
    /// The authenticated principal.
    #[must_use]
    pub const fn principal_id(&self) -> Option<Uuid> {
        self.principal_id
    }

    /// The authenticated role.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Converts to the authenticated principal id and role.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the flow carries no principal,
    /// which cannot happen through the public transitions.
    pub fn into_result(self) -> AuthResult<(Uuid, Role)> {
        match (self.principal_id, self.role) {
            (Some(id), Some(role)) => Ok((id, role)),
            _ => Err(AuthError::Internal(
                "authenticated flow without principal".to_string(),
            )),
        }
    }
}

impl LoginFlow<states::Failed> {
    /// The failure cause, for audit logging.
    #[must_use]
    pub const fn error(&self) -> Option<&AuthError> {
        self.error.as_ref()
    }

    /// Converts to the error the caller sees.
    #[must_use]
    pub fn into_error(self) -> AuthError {
        self.error.unwrap_or(AuthError::InvalidCredentials)
    }
}

/// Outcome of password verification.
#[derive(Debug)]
pub enum PasswordVerified {
    /// No second factor needed, fully authenticated.
    Authenticated(LoginFlow<states::Authenticated>),
    /// A TOTP code must be presented next.
    MfaPending(LoginFlow<states::MfaPending>),
}
