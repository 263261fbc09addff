//! Router configuration.
//!
//! Public routes (register, login, MFA completion) take no credential.
//! Everything else sits behind the authentication middleware, with the
//! restricted user-administration routes additionally gated by the
//! route policy.

use std::sync::Arc;

use axum::{
    Json, Router, middleware,
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bms_core::config::route_names;

use crate::auth::{auth_middleware, require_route};
use crate::handlers;
use crate::state::AppState;

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/login/mfa", post(handlers::mfa_login));

    let account = Router::new()
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/me", get(handlers::me))
        .route("/api/mfa/setup", post(handlers::mfa_setup))
        .route("/api/mfa/confirm", post(handlers::mfa_confirm));

    let users = Router::new()
        .route("/api/users", get(handlers::list_users))
        .route_layer(middleware::from_fn(require_route(
            Arc::clone(&state.gate),
            route_names::USERS_LIST,
        )));

    let roles = Router::new()
        .route("/api/users/{id}/role", put(handlers::change_role))
        .route_layer(middleware::from_fn(require_route(
            Arc::clone(&state.gate),
            route_names::USERS_CHANGE_ROLE,
        )));

    let protected = account.merge(users).merge(roles).layer(
        middleware::from_fn_with_state(state.clone(), auth_middleware),
    );

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(health)
        .route("/", get(root))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Server information response.
#[derive(Serialize)]
pub struct ServerInfo {
    name: String,
    version: String,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Root endpoint handler.
async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: "BMS Auth".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}
