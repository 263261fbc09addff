//! Request handlers for the authentication API.
//!
//! Handlers stay thin: they translate between wire DTOs and the
//! authentication service, which owns all policy. Under the session
//! transport the issued credential is mirrored into an `HttpOnly`
//! cookie so browser clients need no token handling.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use bms_auth::{IssuedCredential, LoginOutcome};
use bms_core::config::TransportKind;

use crate::auth::{self, Caller};
use crate::dto::{
    ChangeRoleRequest, ConfirmMfaRequest, CredentialResponse, EnrollmentResponse, LoginRequest,
    LoginResponse, MfaLoginRequest, PrincipalResponse, RegisterRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/auth/register - Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let principal = state
        .service
        .register(&request.identifier, &request.password, request.role)
        .await?;

    Ok((StatusCode::CREATED, Json(PrincipalResponse::from(principal))))
}

/// POST /api/auth/login - Run the password phase of the login flow
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Response> {
    let outcome = state
        .service
        .login(&request.identifier, &request.password)
        .await?;

    let issued = match &outcome {
        LoginOutcome::Authenticated { credential }
        | LoginOutcome::MfaEnrollmentRequired { credential } => Some(credential.clone()),
        LoginOutcome::MfaRequired { .. } => None,
    };

    let mut response = Json(LoginResponse::from(outcome)).into_response();
    attach_session_cookie(&mut response, issued.as_ref());
    Ok(response)
}

/// POST /api/auth/login/mfa - Complete a pending MFA challenge
pub async fn mfa_login(
    State(state): State<AppState>,
    Json(request): Json<MfaLoginRequest>,
) -> ApiResult<Response> {
    let credential = state
        .service
        .verify_mfa(&request.ticket, &request.code)
        .await?;

    let mut response = Json(CredentialResponse::from(credential.clone())).into_response();
    attach_session_cookie(&mut response, Some(&credential));
    Ok(response)
}

/// POST /api/auth/logout - Revoke the presented credential
pub async fn logout(State(state): State<AppState>, caller: Caller) -> ApiResult<Response> {
    state.service.logout(&caller.credential).await?;

    let mut response = StatusCode::NO_CONTENT.into_response();
    if state.service.transport_kind() == TransportKind::Session {
        response
            .headers_mut()
            .append(header::SET_COOKIE, auth::clear_session_cookie());
    }
    Ok(response)
}

/// GET /api/auth/me - The caller's own account
pub async fn me(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<PrincipalResponse>> {
    let principal = state.service.current_principal(&caller.context).await?;
    Ok(Json(principal.into()))
}

/// POST /api/mfa/setup - Start MFA enrollment for the caller
pub async fn mfa_setup(
    State(state): State<AppState>,
    caller: Caller,
) -> ApiResult<Json<EnrollmentResponse>> {
    let enrollment = state.service.enroll_mfa(&caller.context).await?;
    Ok(Json(enrollment.into()))
}

/// POST /api/mfa/confirm - Confirm an enrollment with a valid code
pub async fn mfa_confirm(
    State(state): State<AppState>,
    caller: Caller,
    Json(request): Json<ConfirmMfaRequest>,
) -> ApiResult<StatusCode> {
    state
        .service
        .confirm_mfa(&caller.context, &request.secret, &request.code)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/users - List all accounts
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<PrincipalResponse>>> {
    let principals = state.service.list_principals().await?;
    Ok(Json(
        principals.into_iter().map(PrincipalResponse::from).collect(),
    ))
}

/// PUT /api/users/{id}/role - Change an account's role
pub async fn change_role(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    Json(request): Json<ChangeRoleRequest>,
) -> ApiResult<Json<PrincipalResponse>> {
    let updated = state
        .service
        .change_role(&caller.context, id, request.role)
        .await?;
    Ok(Json(updated.into()))
}

/// Mirrors a session credential into the session cookie.
fn attach_session_cookie(response: &mut Response, credential: Option<&IssuedCredential>) {
    let Some(credential) = credential else {
        return;
    };
    if credential.kind != TransportKind::Session {
        return;
    }
    if let Some(cookie) = auth::session_cookie(&credential.token, credential.expires_in_seconds) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
}
