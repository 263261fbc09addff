//! Authentication and authorization middleware.
//!
//! The authentication layer resolves the presented credential through
//! the configured transport and injects a [`Caller`] into the request
//! extensions. Role checks are a separate per-route layer driven by the
//! declarative route policy, so an authenticated caller on a restricted
//! route gets 403 while a missing or bad credential always gets 401.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use bms_auth::{AuthContext, AuthError, AuthorizationGate};
use bms_core::config::TransportKind;

use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the session id under the session transport.
pub const SESSION_COOKIE: &str = "bms_session";

/// The authenticated caller behind a request.
///
/// Extracted from the resolved credential and made available to
/// handlers.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Identity resolved from the credential.
    pub context: AuthContext,
    /// The raw credential as presented (for revocation).
    pub credential: String,
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or((StatusCode::UNAUTHORIZED, "Not authenticated"))
    }
}

/// Authentication middleware for protected routes.
///
/// Extracts the credential for the configured transport, resolves it,
/// and injects [`Caller`] into the request extensions. Requests without
/// a resolvable credential are rejected with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(credential) = extract_credential(request.headers(), state.service.transport_kind())
    else {
        return ApiError(AuthError::Unauthenticated).into_response();
    };

    match state.service.resolve(&credential).await {
        Ok(context) => {
            request.extensions_mut().insert(Caller {
                context,
                credential,
            });
            next.run(request).await
        }
        Err(err) => ApiError(err).into_response(),
    }
}

/// Creates a role-checking middleware layer for a named route.
///
/// The route name is looked up in the policy table; requests by callers
/// whose role is not admitted are rejected with 403.
pub fn require_route(
    gate: Arc<AuthorizationGate>,
    route: &'static str,
) -> impl Fn(Request, Next) -> Pin<Box<dyn Future<Output = Response> + Send>> + Clone {
    move |request: Request, next: Next| {
        let gate = Arc::clone(&gate);
        Box::pin(async move {
            let caller = request.extensions().get::<Caller>().cloned();

            match gate.authorize(caller.as_ref().map(|c| &c.context), route) {
                Ok(_) => next.run(request).await,
                Err(err) => ApiError(err).into_response(),
            }
        })
    }
}

/// Extracts the presented credential for a transport.
///
/// Bearer reads the `Authorization: Bearer` header. Session prefers the
/// session cookie and falls back to the bearer header so API clients
/// can skip cookie handling.
#[must_use]
pub fn extract_credential(headers: &HeaderMap, kind: TransportKind) -> Option<String> {
    match kind {
        TransportKind::Bearer => bearer_token(headers),
        TransportKind::Session => {
            cookie_value(headers, SESSION_COOKIE).or_else(|| bearer_token(headers))
        }
    }
}

/// Builds a `Set-Cookie` value carrying a session id.
#[must_use]
pub fn session_cookie(token: &str, max_age_seconds: i64) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    ))
    .ok()
}

/// Builds a `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("bms_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(name)?.strip_prefix('='))
        .map(String::from)
}
