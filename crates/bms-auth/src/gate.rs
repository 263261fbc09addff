//! Authorization gate.
//!
//! Two distinct denials, checked in a fixed order: a missing or
//! unresolved caller is `Unauthenticated`, an authenticated caller
//! whose role is not admitted is `Forbidden`. The order never flips,
//! so an anonymous caller learns nothing about a route's role rules.
//!
//! Role requirements come from the [`RoutePolicy`] table. Handlers name
//! routes; they never compare role literals themselves.

use bms_core::config::RoutePolicy;
use bms_model::RoleSet;

use crate::error::{AuthError, AuthResult};
use crate::transport::AuthContext;

/// Enforces authentication and role admission.
pub struct AuthorizationGate {
    routes: RoutePolicy,
}

impl AuthorizationGate {
    /// Creates a gate over a route policy table.
    #[must_use]
    pub const fn new(routes: RoutePolicy) -> Self {
        Self { routes }
    }

    /// Requires an authenticated caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] if there is none.
    pub fn require_authenticated<'a>(
        &self,
        context: Option<&'a AuthContext>,
    ) -> AuthResult<&'a AuthContext> {
        context.ok_or(AuthError::Unauthenticated)
    }

    /// Requires an authenticated caller whose role is in `allowed`.
    ///
    /// Membership is exact set membership in the closed role enum.
    /// There is no implicit hierarchy; a broader allowed set is how a
    /// route admits more privileged roles.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] with no caller, then
    /// [`AuthError::Forbidden`] if the role is not admitted.
    pub fn require_role<'a>(
        &self,
        context: Option<&'a AuthContext>,
        allowed: &RoleSet,
    ) -> AuthResult<&'a AuthContext> {
        let context = self.require_authenticated(context)?;

        if allowed.contains(context.role) {
            Ok(context)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Authorizes a named route against the policy table.
    ///
    /// A route without a rule admits any authenticated caller.
    ///
    /// # Errors
    ///
    /// Same contract as [`AuthorizationGate::require_role`].
    pub fn authorize<'a>(
        &self,
        context: Option<&'a AuthContext>,
        route: &str,
    ) -> AuthResult<&'a AuthContext> {
        match self.routes.allowed_roles(route) {
            None => self.require_authenticated(context),
            Some(allowed) => self.require_role(context, allowed),
        }
    }

    /// The policy table the gate was built with.
    #[must_use]
    pub const fn routes(&self) -> &RoutePolicy {
        &self.routes
    }
}
