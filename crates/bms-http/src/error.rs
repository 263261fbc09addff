//! HTTP API error types.
//!
//! Maps authentication errors to HTTP responses. The mapping preserves
//! the vagueness guarantees of the auth layer: every credential failure
//! is a 401 with the same body, and internal detail never reaches the
//! wire.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bms_auth::AuthError;

/// An authentication error carried to the HTTP boundary.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AuthError);

impl ApiError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::Validation(_) | AuthError::WeakPassword { .. } => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::InvalidMfaCode
            | AuthError::NoPendingMfa
            | AuthError::Unauthenticated
            | AuthError::InvalidToken
            | AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::DuplicateIdentifier { .. } => StatusCode::CONFLICT,
            AuthError::TooManyAttempts { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match &self.0 {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::InvalidMfaCode => "invalid_mfa_code",
            AuthError::NoPendingMfa => "no_pending_mfa",
            AuthError::DuplicateIdentifier { .. } => "duplicate_identifier",
            AuthError::WeakPassword { .. } => "weak_password",
            AuthError::Validation(_) => "validation_error",
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::Forbidden => "forbidden",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::TooManyAttempts { .. } => "too_many_attempts",
            AuthError::NotFound => "not_found",
            AuthError::Configuration(_) | AuthError::Internal(_) => "internal_error",
        }
    }
}

/// API error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error: String,
    /// Human-readable error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.0.to_string()),
        };

        let mut response = (status, Json(body)).into_response();

        if let AuthError::TooManyAttempts {
            retry_after_seconds,
        } = &self.0
        {
            if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
