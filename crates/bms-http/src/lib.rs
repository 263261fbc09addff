//! # bms-http
//!
//! Axum HTTP server for the BMS authentication API.
//!
//! This crate wires the authentication engine to its HTTP surface:
//! registration, the two-phase login flow, TOTP enrollment, session or
//! bearer credential handling, and the policy-gated user administration
//! routes.
//!
//! ## Usage
//!
//! ```ignore
//! use bms_http::{Server, ServerConfig};
//!
//! let config = ServerConfig::from_env()?;
//! let server = Server::new(config)?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod seed;
pub mod state;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;

use bms_auth::{
    AuthService, AuthorizationGate, LoginThrottle, SlidingWindowThrottle, build_transport,
};
use bms_core::event::{EventLogger, TracingEventLogger};
use bms_session::{
    InMemoryPendingMfaStore, InMemorySessionStore, PendingMfaStore, SessionStore,
};
use bms_store::{CredentialStore, InMemoryCredentialStore};

/// The BMS authentication server.
pub struct Server {
    config: Arc<ServerConfig>,
    state: AppState,
    sessions: Arc<InMemorySessionStore>,
    pending: Arc<InMemoryPendingMfaStore>,
    throttle: Arc<SlidingWindowThrottle>,
}

impl Server {
    /// Creates a new server instance over in-memory providers.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation, such as
    /// selecting the bearer transport without a signing secret.
    pub fn new(config: ServerConfig) -> anyhow::Result<Self> {
        config.auth.validate()?;

        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let pending = Arc::new(InMemoryPendingMfaStore::new());
        let throttle = Arc::new(SlidingWindowThrottle::from_config(&config.auth.rate_limit));
        let events: Arc<dyn EventLogger> = Arc::new(TracingEventLogger::new());

        let transport = build_transport(
            &config.auth,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
        )?;

        let service = Arc::new(AuthService::new(
            &config.auth,
            store,
            transport,
            Arc::clone(&pending) as Arc<dyn PendingMfaStore>,
            Arc::clone(&throttle) as Arc<dyn LoginThrottle>,
            events,
        ));
        let gate = Arc::new(AuthorizationGate::new(config.auth.routes.clone()));

        let config = Arc::new(config);
        let state = AppState::new(Arc::clone(&config), service, gate);

        Ok(Self {
            config,
            state,
            sessions,
            pending,
            throttle,
        })
    }

    /// Runs the server.
    ///
    /// Blocks until a shutdown signal is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound or the
    /// server fails while serving.
    pub async fn run(self) -> anyhow::Result<()> {
        if self.config.seed_demo_users {
            let created = seed::seed_demo_accounts(&self.state.service).await?;
            tracing::info!(created, "demo accounts ready");
        }

        let sweeper = tokio::spawn(sweep_loop(
            Arc::clone(&self.sessions),
            Arc::clone(&self.pending),
            Arc::clone(&self.throttle),
            Duration::from_secs(self.config.sweep_interval_seconds),
        ));

        let app = create_router(self.state.clone());

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        sweeper.abort();
        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Creates the router without starting the server.
    ///
    /// This is useful for integration testing.
    #[must_use]
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }
}

/// Periodically reclaims expired sessions, pending tickets and
/// throttle windows.
async fn sweep_loop(
    sessions: Arc<InMemorySessionStore>,
    pending: Arc<InMemoryPendingMfaStore>,
    throttle: Arc<SlidingWindowThrottle>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let swept_sessions = sessions.remove_expired().await.unwrap_or(0);
        let swept_tickets = pending.remove_expired().await.unwrap_or(0);
        let swept_throttle = throttle.remove_expired().await;

        if swept_sessions + swept_tickets + swept_throttle > 0 {
            tracing::debug!(
                sessions = swept_sessions,
                tickets = swept_tickets,
                throttle_keys = swept_throttle,
                "swept expired state"
            );
        }
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
