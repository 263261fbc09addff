//! Credential transports.
//!
//! One capability, two implementations. [`SessionTransport`] issues an
//! opaque id backed by a server-side record and can revoke it.
//! [`BearerTransport`] issues a signed stateless token; validity is
//! signature plus expiry, and revocation before expiry is impossible.
//! Which one a deployment uses is configuration, not code.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use bms_core::config::{AuthConfig, TransportKind};
use bms_model::{Principal, Role};
use bms_session::{Session, SessionStore};
use bms_token::{SigningSecret, TokenManager};

use crate::error::{AuthError, AuthResult};

/// An authenticated caller, resolved from a presented credential.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The principal's id.
    pub principal_id: Uuid,
    /// The principal's login identifier.
    pub identifier: String,
    /// The principal's role when the credential was issued.
    pub role: Role,
}

/// A credential issued to the client after authentication.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedCredential {
    /// Opaque credential string: a session id or a signed token.
    pub token: String,
    /// Seconds until the credential expires.
    pub expires_in_seconds: i64,
    /// Which transport issued it.
    pub kind: TransportKind,
}

/// Issues, resolves and revokes client credentials.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    /// Issues a credential for a fully authenticated principal.
    async fn issue(&self, principal: &Principal) -> AuthResult<IssuedCredential>;

    /// Resolves a presented credential to an authenticated caller.
    ///
    /// ## Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] for an unknown or expired
    /// session, [`AuthError::InvalidToken`] or [`AuthError::ExpiredToken`]
    /// for a bad bearer token.
    async fn resolve(&self, credential: &str) -> AuthResult<AuthContext>;

    /// Revokes a credential, where the transport supports it.
    async fn revoke(&self, credential: &str) -> AuthResult<()>;

    /// The transport kind, for surface concerns like cookie handling.
    fn kind(&self) -> TransportKind;
}

impl std::fmt::Debug for dyn AuthTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTransport")
            .field("kind", &self.kind())
            .finish()
    }
}

/// Server-side session transport.
pub struct SessionTransport {
    store: Arc<dyn SessionStore>,
    ttl_seconds: i64,
}

impl SessionTransport {
    /// Creates a session transport over a session store.
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>, ttl_seconds: i64) -> Self {
        Self { store, ttl_seconds }
    }
}

#[async_trait]
impl AuthTransport for SessionTransport {
    async fn issue(&self, principal: &Principal) -> AuthResult<IssuedCredential> {
        let session = Session::new(
            principal.id,
            &principal.identifier,
            principal.role,
            self.ttl_seconds,
        )
        .with_mfa_verified(principal.is_mfa_enrolled());

        self.store.create(&session).await?;

        Ok(IssuedCredential {
            token: session.id,
            expires_in_seconds: self.ttl_seconds,
            kind: TransportKind::Session,
        })
    }

    async fn resolve(&self, credential: &str) -> AuthResult<AuthContext> {
        let session = self
            .store
            .get(credential)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        Ok(AuthContext {
            principal_id: session.principal_id,
            identifier: session.identifier,
            role: session.role,
        })
    }

    async fn revoke(&self, credential: &str) -> AuthResult<()> {
        self.store.remove(credential).await?;
        Ok(())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Session
    }
}

/// Stateless signed bearer token transport.
pub struct BearerTransport {
    manager: TokenManager,
}

impl BearerTransport {
    /// Creates a bearer transport over a token manager.
    #[must_use]
    pub const fn new(manager: TokenManager) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl AuthTransport for BearerTransport {
    async fn issue(&self, principal: &Principal) -> AuthResult<IssuedCredential> {
        let token = self.manager.issue(principal)?;

        Ok(IssuedCredential {
            token,
            expires_in_seconds: self.manager.lifetime_seconds(),
            kind: TransportKind::Bearer,
        })
    }

    async fn resolve(&self, credential: &str) -> AuthResult<AuthContext> {
        let claims = self.manager.verify(credential)?;

        Ok(AuthContext {
            principal_id: claims.sub,
            identifier: claims.identifier,
            role: claims.role,
        })
    }

    // Stateless tokens stay valid until expiry. Nothing to remove.
    async fn revoke(&self, _credential: &str) -> AuthResult<()> {
        Ok(())
    }

    fn kind(&self) -> TransportKind {
        TransportKind::Bearer
    }
}

/// Builds the transport named by the configuration.
///
/// # Errors
///
/// Returns [`AuthError::Configuration`] if the bearer transport is
/// selected without a signing secret.
pub fn build_transport(
    config: &AuthConfig,
    session_store: Arc<dyn SessionStore>,
) -> AuthResult<Arc<dyn AuthTransport>> {
    match config.transport {
        TransportKind::Session => Ok(Arc::new(SessionTransport::new(
            session_store,
            config.session.ttl_seconds,
        ))),
        TransportKind::Bearer => {
            let secret = config.token.secret.as_deref().ok_or_else(|| {
                AuthError::Configuration(
                    "bearer transport requires a signing secret".to_string(),
                )
            })?;

            let manager = TokenManager::new(
                SigningSecret::new(secret.as_bytes()),
                config.token.issuer.clone(),
                config.token.lifetime_seconds,
            );
            Ok(Arc::new(BearerTransport::new(manager)))
        }
    }
}
