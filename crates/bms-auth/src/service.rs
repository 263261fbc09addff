//! Authentication service facade.
//!
//! `AuthService` drives the login state machine across its injected
//! capabilities: the credential store, the configured transport, the
//! pending-MFA ticket store, the rate limiter and the audit sink. All
//! policy (second-factor roles, password rules, rate limits) comes from
//! configuration.
//!
//! Failure discipline: nothing is persisted on a failed attempt, and a
//! failed attempt reports "invalid credentials" whether the identifier
//! or the password was wrong. The distinction lives only in the audit
//! trail.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use bms_core::config::{AuthConfig, MfaPolicy, PasswordConfig, TransportKind};
use bms_core::event::{Event, EventLogger, EventType};
use bms_model::{Principal, Role};
use bms_session::{PendingMfa, PendingMfaStore};
use bms_store::CredentialStore;

use crate::error::{AuthError, AuthResult};
use crate::flow::{states, LoginFlow, PasswordVerified};
use crate::password::PasswordHasherService;
use crate::throttle::{LoginThrottle, ThrottleDecision};
use crate::totp::{self, MfaEnrollment, TotpConfig, TotpVerifier};
use crate::transport::{AuthContext, AuthTransport, IssuedCredential};

/// Outcome of a login attempt that did not fail.
#[derive(Debug)]
pub enum LoginOutcome {
    /// Fully authenticated, credential issued.
    Authenticated {
        /// The issued credential.
        credential: IssuedCredential,
    },
    /// Password accepted; a TOTP code must be presented with the ticket.
    MfaRequired {
        /// Single-use ticket naming the pending challenge.
        ticket: String,
    },
    /// Password accepted and a credential issued, but policy requires a
    /// second factor for this role and none is enrolled yet.
    MfaEnrollmentRequired {
        /// The issued credential, usable to reach the enrollment routes.
        credential: IssuedCredential,
    },
}

/// Orchestrates authentication, enrollment and account operations.
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    transport: Arc<dyn AuthTransport>,
    pending: Arc<dyn PendingMfaStore>,
    throttle: Arc<dyn LoginThrottle>,
    events: Arc<dyn EventLogger>,
    hasher: PasswordHasherService,
    totp: TotpConfig,
    mfa: MfaPolicy,
    password: PasswordConfig,
}

impl AuthService {
    /// Creates a service over its injected capabilities.
    #[must_use]
    pub fn new(
        config: &AuthConfig,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn AuthTransport>,
        pending: Arc<dyn PendingMfaStore>,
        throttle: Arc<dyn LoginThrottle>,
        events: Arc<dyn EventLogger>,
    ) -> Self {
        Self {
            store,
            transport,
            pending,
            throttle,
            events,
            hasher: PasswordHasherService::with_defaults(),
            totp: TotpConfig::default(),
            mfa: config.mfa.clone(),
            password: config.password.clone(),
        }
    }

    /// The kind of transport this service issues credentials through.
    #[must_use]
    pub fn transport_kind(&self) -> TransportKind {
        self.transport.kind()
    }

    // === Registration ===

    /// Registers a new principal.
    ///
    /// The identifier is normalized (emails compare case-insensitively)
    /// and the password is checked against the acceptance rules before
    /// hashing. Without an explicit role the lowest role is assigned.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for an empty identifier,
    /// [`AuthError::WeakPassword`] for a short password, and
    /// [`AuthError::DuplicateIdentifier`] when the identifier is taken.
    pub async fn register(
        &self,
        identifier: &str,
        password: &str,
        role: Option<Role>,
    ) -> AuthResult<Principal> {
        let normalized = Principal::normalize_identifier(identifier);
        if normalized.is_empty() {
            return Err(AuthError::Validation("identifier is required".to_string()));
        }

        if password.chars().count() < self.password.min_length {
            let err = AuthError::WeakPassword {
                min_length: self.password.min_length,
            };
            self.audit(
                Event::builder(EventType::RegisterError)
                    .failure(err.to_string())
                    .identifier(&normalized)
                    .build(),
            )
            .await;
            return Err(err);
        }

        let hash = self.hasher.hash(password)?;
        let principal = Principal::new(&normalized, hash, role.unwrap_or_else(Role::lowest));

        match self.store.create(&principal).await {
            Ok(()) => {
                self.audit(
                    Event::builder(EventType::Register)
                        .success()
                        .principal(principal.id)
                        .identifier(&normalized)
                        .detail("role", principal.role.as_str())
                        .build(),
                )
                .await;
                Ok(principal)
            }
            Err(err) => {
                self.audit(
                    Event::builder(EventType::RegisterError)
                        .failure(err.to_string())
                        .identifier(&normalized)
                        .build(),
                )
                .await;
                Err(err.into())
            }
        }
    }

    // === Login ===

    /// Runs the password phase of the login state machine.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TooManyAttempts`] when the identifier is
    /// rate limited (checked before any verification, so a correct
    /// password does not bypass it) and the deliberately vague
    /// [`AuthError::InvalidCredentials`] for every credential failure.
    pub async fn login(&self, identifier: &str, password: &str) -> AuthResult<LoginOutcome> {
        let normalized = Principal::normalize_identifier(identifier);

        if let ThrottleDecision::Limited {
            retry_after_seconds,
        } = self.throttle.acquire(&normalized).await
        {
            self.audit(
                Event::builder(EventType::RateLimited)
                    .failure("too many attempts")
                    .identifier(&normalized)
                    .build(),
            )
            .await;
            return Err(AuthError::TooManyAttempts {
                retry_after_seconds,
            });
        }

        let flow = LoginFlow::begin(&normalized).submit_password();

        let Some(principal) = self.store.find_by_identifier(&normalized).await? else {
            return Err(self.reject_password(flow, "unknown identifier").await);
        };

        if !self.hasher.verify(password, &principal.password_hash) {
            return Err(self.reject_password(flow, "password mismatch").await);
        }

        match flow.password_verified(principal.id, principal.role, principal.is_mfa_enrolled()) {
            PasswordVerified::MfaPending(flow) => {
                let pending = PendingMfa::new(principal.id, self.mfa.pending_ttl_seconds);
                self.pending.put(&pending).await?;

                debug!(identifier = %flow.identifier(), "login pending second factor");
                self.audit(
                    Event::builder(EventType::Login)
                        .success()
                        .principal(principal.id)
                        .identifier(&normalized)
                        .session(&pending.ticket)
                        .detail("mfa", "required")
                        .build(),
                )
                .await;

                Ok(LoginOutcome::MfaRequired {
                    ticket: pending.ticket,
                })
            }
            PasswordVerified::Authenticated(flow) => {
                let (principal_id, role) = flow.into_result()?;
                let credential = self.transport.issue(&principal).await?;

                self.audit(
                    Event::builder(EventType::Login)
                        .success()
                        .principal(principal_id)
                        .identifier(&normalized)
                        .build(),
                )
                .await;

                if self.mfa.requires_mfa(role) && !principal.is_mfa_enrolled() {
                    Ok(LoginOutcome::MfaEnrollmentRequired { credential })
                } else {
                    Ok(LoginOutcome::Authenticated { credential })
                }
            }
        }
    }

    /// Completes a pending MFA challenge.
    ///
    /// The ticket is consumed only by a successful verification; a
    /// wrong code leaves the challenge pending until the ticket
    /// expires.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NoPendingMfa`] for an unknown, expired or
    /// no longer actionable ticket, and [`AuthError::InvalidMfaCode`]
    /// when the code does not verify.
    pub async fn verify_mfa(&self, ticket: &str, code: &str) -> AuthResult<IssuedCredential> {
        let Some(pending) = self.pending.get(ticket).await? else {
            self.audit(
                Event::builder(EventType::MfaVerifyError)
                    .failure("no pending challenge")
                    .session(ticket)
                    .build(),
            )
            .await;
            return Err(AuthError::NoPendingMfa);
        };

        let Some(principal) = self.store.find_by_id(pending.principal_id).await? else {
            self.pending.remove(ticket).await?;
            return Err(AuthError::NoPendingMfa);
        };

        let Some(secret) = principal.mfa_secret.as_deref() else {
            self.pending.remove(ticket).await?;
            return Err(AuthError::NoPendingMfa);
        };
        let Some(raw) = totp::decode_secret(secret) else {
            return Err(AuthError::Internal(
                "stored MFA secret is not valid base32".to_string(),
            ));
        };

        let flow = LoginFlow::resume_mfa(&principal.identifier, principal.id, principal.role);

        if let Err(err) = TotpVerifier::verify(&raw, code, &self.totp) {
            let failed = flow.code_rejected(err);
            self.audit(
                Event::builder(EventType::MfaVerifyError)
                    .failure("code mismatch")
                    .principal(principal.id)
                    .identifier(&principal.identifier)
                    .session(ticket)
                    .build(),
            )
            .await;
            return Err(failed.into_error());
        }

        self.pending.remove(ticket).await?;

        let (principal_id, _) = flow.code_accepted().into_result()?;
        let credential = self.transport.issue(&principal).await?;

        self.audit(
            Event::builder(EventType::MfaVerify)
                .success()
                .principal(principal_id)
                .identifier(&principal.identifier)
                .build(),
        )
        .await;

        Ok(credential)
    }

    /// Revokes a credential and records the logout.
    ///
    /// Revoking an unknown credential is not an error, and a bearer
    /// credential survives revocation by design of that transport.
    ///
    /// # Errors
    ///
    /// Returns an error only for store failures.
    pub async fn logout(&self, credential: &str) -> AuthResult<()> {
        // Resolve first so the audit names the principal when possible
        let context = self.transport.resolve(credential).await.ok();
        self.transport.revoke(credential).await?;

        let mut builder = Event::builder(EventType::Logout).success();
        if let Some(ctx) = &context {
            builder = builder.principal(ctx.principal_id).identifier(&ctx.identifier);
        }
        self.audit(builder.build()).await;

        Ok(())
    }

    // === Resolution ===

    /// Resolves a presented credential to an authenticated caller.
    ///
    /// # Errors
    ///
    /// Passes through the transport's resolution errors.
    pub async fn resolve(&self, credential: &str) -> AuthResult<AuthContext> {
        self.transport.resolve(credential).await
    }

    /// Loads the principal behind an authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] if the principal no
    /// longer exists.
    pub async fn current_principal(&self, context: &AuthContext) -> AuthResult<Principal> {
        self.store
            .find_by_id(context.principal_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    // === MFA enrollment ===

    /// Starts MFA enrollment for the caller.
    ///
    /// Generates a fresh secret and provisioning URI. Nothing is
    /// persisted; any active enrollment stays in force until
    /// [`AuthService::confirm_mfa`] proves possession of this one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] if the caller's principal
    /// no longer exists.
    pub async fn enroll_mfa(&self, context: &AuthContext) -> AuthResult<MfaEnrollment> {
        let principal = self.current_principal(context).await?;

        let enrollment =
            MfaEnrollment::generate(&self.mfa.issuer, &principal.identifier, &self.totp);

        self.audit(
            Event::builder(EventType::MfaEnrollStarted)
                .success()
                .principal(principal.id)
                .identifier(&principal.identifier)
                .build(),
        )
        .await;

        Ok(enrollment)
    }

    /// Confirms an enrollment by verifying a code for the candidate
    /// secret, then persists it and enables the second factor.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a secret that is not
    /// plausible base32 key material and [`AuthError::InvalidMfaCode`]
    /// when the code does not verify. The principal is unchanged on
    /// failure.
    pub async fn confirm_mfa(
        &self,
        context: &AuthContext,
        secret: &str,
        code: &str,
    ) -> AuthResult<()> {
        let principal = self.current_principal(context).await?;

        let canonical = secret.trim_end_matches('=').to_ascii_uppercase();
        let raw = totp::decode_secret(&canonical)
            .filter(|raw| raw.len() >= bms_crypto::random::OTP_SECRET_LENGTH)
            .ok_or_else(|| AuthError::Validation("secret is not valid key material".to_string()))?;

        if let Err(err) = TotpVerifier::verify(&raw, code, &self.totp) {
            self.audit(
                Event::builder(EventType::MfaVerifyError)
                    .failure("code mismatch")
                    .principal(principal.id)
                    .identifier(&principal.identifier)
                    .detail("phase", "enrollment")
                    .build(),
            )
            .await;
            return Err(err);
        }

        self.store
            .set_mfa_secret(principal.id, Some(canonical))
            .await?;
        self.store.set_mfa_enabled(principal.id, true).await?;

        self.audit(
            Event::builder(EventType::MfaEnrollConfirmed)
                .success()
                .principal(principal.id)
                .identifier(&principal.identifier)
                .build(),
        )
        .await;

        Ok(())
    }

    // === Administration ===

    /// Changes a principal's role.
    ///
    /// Authorization is the route policy's business; the actor here is
    /// recorded for the audit trail.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotFound`] for an unknown principal.
    pub async fn change_role(
        &self,
        actor: &AuthContext,
        target: Uuid,
        role: Role,
    ) -> AuthResult<Principal> {
        self.store.set_role(target, role).await?;
        let principal = self
            .store
            .find_by_id(target)
            .await?
            .ok_or(AuthError::NotFound)?;

        self.audit(
            Event::builder(EventType::RoleChanged)
                .success()
                .principal(target)
                .identifier(&principal.identifier)
                .detail("role", role.as_str())
                .detail("changed_by", actor.identifier.clone())
                .build(),
        )
        .await;

        Ok(principal)
    }

    /// Lists all principals, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns an error only for store failures.
    pub async fn list_principals(&self) -> AuthResult<Vec<Principal>> {
        Ok(self.store.list().await?)
    }

    // === Internals ===

    async fn reject_password(
        &self,
        flow: LoginFlow<states::PasswordPending>,
        cause: &str,
    ) -> AuthError {
        let failed = flow.rejected(AuthError::InvalidCredentials);

        self.audit(
            Event::builder(EventType::LoginError)
                .failure(cause)
                .identifier(failed.identifier())
                .build(),
        )
        .await;

        failed.into_error()
    }

    async fn audit(&self, event: Event) {
        self.events.log(event).await;
    }
}
