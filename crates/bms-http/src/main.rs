//! # BMS Server
//!
//! Main entry point for the BMS authentication server.

#![forbid(unsafe_code)]
#![deny(warnings)]

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = bms_http::ServerConfig::from_env()?;
    tracing::info!(transport = ?config.auth.transport, "BMS auth server starting");

    let server = bms_http::Server::new(config)?;
    server.run().await
}
