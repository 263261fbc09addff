//! Application state shared across request handlers.

use std::sync::Arc;

use bms_auth::{AuthService, AuthorizationGate};

use crate::config::ServerConfig;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,

    /// The authentication service.
    pub service: Arc<AuthService>,

    /// The route authorization gate.
    pub gate: Arc<AuthorizationGate>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        config: Arc<ServerConfig>,
        service: Arc<AuthService>,
        gate: Arc<AuthorizationGate>,
    ) -> Self {
        Self {
            config,
            service,
            gate,
        }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
