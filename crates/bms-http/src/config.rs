//! Server configuration.
//!
//! The authentication policy (`AuthConfig`) can come from a JSON file
//! named by `BMS_CONFIG`; individual environment variables override it.
//! The token signing secret is only ever taken from the environment and
//! has no default.

use bms_core::config::{AuthConfig, TransportKind};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Authentication policy.
    pub auth: AuthConfig,

    /// Whether to create the demo accounts at startup.
    pub seed_demo_users: bool,

    /// Interval between expired-state sweeps, in seconds.
    pub sweep_interval_seconds: u64,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed, if
    /// an override value is malformed, or if the resulting policy fails
    /// validation (for instance the bearer transport without a secret).
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let host = std::env::var("BMS_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("BMS_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let mut auth = match std::env::var("BMS_CONFIG") {
            Ok(path) => {
                let raw = std::fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("cannot read config file {path}: {e}"))?;
                AuthConfig::from_json_str(&raw)?
            }
            Err(_) => AuthConfig::default(),
        };

        if let Ok(transport) = std::env::var("BMS_AUTH_TRANSPORT") {
            auth.transport = match transport.to_lowercase().as_str() {
                "session" => TransportKind::Session,
                "bearer" => TransportKind::Bearer,
                other => anyhow::bail!(
                    "unknown transport {other:?} (expected \"session\" or \"bearer\")"
                ),
            };
        }

        if let Ok(secret) = std::env::var("BMS_TOKEN_SECRET") {
            auth.token.secret = Some(secret);
        }
        if let Some(ttl) = env_parse("BMS_SESSION_TTL") {
            auth.session.ttl_seconds = ttl;
        }
        if let Some(lifetime) = env_parse("BMS_TOKEN_LIFETIME") {
            auth.token.lifetime_seconds = lifetime;
        }
        if let Ok(issuer) = std::env::var("BMS_MFA_ISSUER") {
            auth.mfa.issuer = issuer;
        }
        if let Some(max_attempts) = env_parse("BMS_RATE_LIMIT_MAX_ATTEMPTS") {
            auth.rate_limit.max_attempts = max_attempts;
        }
        if let Some(window) = env_parse("BMS_RATE_LIMIT_WINDOW") {
            auth.rate_limit.window_seconds = window;
        }

        auth.validate()?;

        let seed_demo_users = std::env::var("BMS_SEED_DEMO_USERS")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        let sweep_interval_seconds = env_parse("BMS_SWEEP_INTERVAL").unwrap_or(60);

        Ok(Self {
            host,
            port,
            auth,
            seed_demo_users,
            sweep_interval_seconds,
        })
    }

    /// Creates a configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            auth: AuthConfig::default(),
            seed_demo_users: false,
            sweep_interval_seconds: 60,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            auth: AuthConfig::default(),
            seed_demo_users: false,
            sweep_interval_seconds: 60,
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
