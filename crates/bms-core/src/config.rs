//! Declarative configuration for the authentication core.
//!
//! Everything that was a hardcoded policy in the original system lives
//! here: which transport issues credentials, which roles must present a
//! second factor, which roles a route admits, and the rate-limit bounds.
//!
//! The token signing secret is the one value with no default. A bearer
//! deployment that does not supply one fails validation instead of
//! falling back to a forgeable constant.

use serde::{Deserialize, Serialize};

use bms_model::{Role, RoleSet};

use crate::error::{Error, Result};

/// Minimum accepted signing secret length, in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Top-level configuration for the authentication core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Which credential transport issues and resolves credentials.
    pub transport: TransportKind,
    /// Server-side session settings (session transport).
    pub session: SessionConfig,
    /// Signed bearer token settings (bearer transport).
    pub token: TokenConfig,
    /// Second-factor policy.
    pub mfa: MfaPolicy,
    /// Login attempt rate limiting.
    pub rate_limit: RateLimitConfig,
    /// Password acceptance rules for registration.
    pub password: PasswordConfig,
    /// Route-to-allowed-roles policy table.
    pub routes: RoutePolicy,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            transport: TransportKind::Session,
            session: SessionConfig::default(),
            token: TokenConfig::default(),
            mfa: MfaPolicy::default(),
            rate_limit: RateLimitConfig::default(),
            password: PasswordConfig::default(),
            routes: RoutePolicy::default(),
        }
    }
}

impl AuthConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document does not parse or the
    /// parsed configuration fails [`AuthConfig::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the bearer transport is selected
    /// without a signing secret, if a supplied secret is shorter than
    /// [`MIN_SECRET_LENGTH`], or if a lifetime is not positive.
    pub fn validate(&self) -> Result<()> {
        if let Some(secret) = &self.token.secret {
            if secret.len() < MIN_SECRET_LENGTH {
                return Err(Error::Config(format!(
                    "token signing secret must be at least {MIN_SECRET_LENGTH} bytes"
                )));
            }
        } else if self.transport == TransportKind::Bearer {
            return Err(Error::Config(
                "token signing secret is required for the bearer transport; \
                 there is no default"
                    .to_string(),
            ));
        }

        if self.session.ttl_seconds <= 0 {
            return Err(Error::Config("session ttl must be positive".to_string()));
        }
        if self.token.lifetime_seconds <= 0 {
            return Err(Error::Config("token lifetime must be positive".to_string()));
        }
        if self.mfa.pending_ttl_seconds <= 0 {
            return Err(Error::Config(
                "pending MFA ttl must be positive".to_string(),
            ));
        }
        if self.rate_limit.max_attempts == 0 {
            return Err(Error::Config(
                "rate limit must allow at least one attempt".to_string(),
            ));
        }
        if self.rate_limit.window_seconds <= 0 {
            return Err(Error::Config(
                "rate limit window must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// Credential transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Opaque server-side session: the server holds the record.
    #[default]
    Session,
    /// Signed stateless bearer token: validity is signature plus expiry.
    Bearer,
}

/// Server-side session settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Absolute session lifetime from creation, in seconds.
    pub ttl_seconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { ttl_seconds: 3600 }
    }
}

/// Signed bearer token settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Issuer claim embedded in and required from every token.
    pub issuer: String,
    /// Token lifetime from issuance, in seconds.
    pub lifetime_seconds: i64,
    /// HMAC signing secret. Required for the bearer transport, never
    /// defaulted, and never serialized back out.
    #[serde(skip_serializing)]
    pub secret: Option<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            issuer: "bms".to_string(),
            lifetime_seconds: 7 * 24 * 3600,
            secret: None,
        }
    }
}

/// Second-factor policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MfaPolicy {
    /// Roles that must present a TOTP code at login.
    pub required_roles: Vec<Role>,
    /// Issuer name embedded in provisioning URIs.
    pub issuer: String,
    /// Lifetime of a pending-MFA ticket, in seconds.
    pub pending_ttl_seconds: i64,
}

impl Default for MfaPolicy {
    fn default() -> Self {
        Self {
            required_roles: vec![Role::SystemAdmin],
            issuer: "BMS".to_string(),
            pending_ttl_seconds: 300,
        }
    }
}

impl MfaPolicy {
    /// Checks whether policy demands a second factor for `role`.
    #[must_use]
    pub fn requires_mfa(&self, role: Role) -> bool {
        self.required_roles.contains(&role)
    }
}

/// Login attempt rate limiting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Maximum attempts per identifier within the window.
    pub max_attempts: u32,
    /// Rolling window length, in seconds.
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            window_seconds: 60,
        }
    }
}

/// Password acceptance rules for registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    /// Minimum password length, in characters.
    pub min_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

/// Well-known route names used by the default policy table.
pub mod route_names {
    /// Listing all principals.
    pub const USERS_LIST: &str = "users:list";
    /// Changing a principal's role.
    pub const USERS_CHANGE_ROLE: &str = "users:changeRole";
}

/// One rule in the route policy table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRule {
    /// Route name the rule applies to.
    pub route: String,
    /// Roles admitted to the route.
    pub allowed: RoleSet,
}

/// Declarative route-to-allowed-roles table.
///
/// Consumed by the authorization gate; handlers never compare role
/// literals themselves. A route with no rule is authenticated-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoutePolicy {
    rules: Vec<RouteRule>,
}

impl Default for RoutePolicy {
    fn default() -> Self {
        Self {
            rules: vec![
                RouteRule {
                    route: route_names::USERS_LIST.to_string(),
                    allowed: RoleSet::of(&[Role::StoreOwner, Role::SystemAdmin]),
                },
                RouteRule {
                    route: route_names::USERS_CHANGE_ROLE.to_string(),
                    allowed: RoleSet::of(&[Role::SystemAdmin]),
                },
            ],
        }
    }
}

impl RoutePolicy {
    /// Creates an empty policy table.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule, replacing any existing rule for the same route.
    #[must_use]
    pub fn with_rule(mut self, route: impl Into<String>, allowed: RoleSet) -> Self {
        let route = route.into();
        self.rules.retain(|r| r.route != route);
        self.rules.push(RouteRule { route, allowed });
        self
    }

    /// Looks up the allowed role set for a route.
    ///
    /// `None` means the route has no role restriction beyond
    /// authentication.
    #[must_use]
    pub fn allowed_roles(&self, route: &str) -> Option<&RoleSet> {
        self.rules.iter().find(|r| r.route == route).map(|r| &r.allowed)
    }
}
