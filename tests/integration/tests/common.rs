//! Common test utilities and fixtures.

use std::net::TcpListener;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tokio::time::sleep;

use bms_auth::totp;
use bms_auth::{TotpConfig, TotpVerifier};
use bms_core::config::TransportKind;
use bms_http::{Server, ServerConfig};

/// Test environment that runs a server on an ephemeral port.
pub struct TestEnv {
    /// Base URL of the running server.
    pub base_url: String,
    /// HTTP client for testing.
    pub client: Client,
    /// Server shutdown signal.
    _shutdown_tx: oneshot::Sender<()>,
}

impl TestEnv {
    /// Starts a server with the default session transport.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(ServerConfig::for_testing()).await
    }

    /// Starts a server with the stateless bearer token transport.
    pub async fn bearer() -> anyhow::Result<Self> {
        let mut config = ServerConfig::for_testing();
        config.auth.transport = TransportKind::Bearer;
        config.auth.token.secret = Some("integration-signing-secret-0123456789abcdef".to_string());
        Self::with_config(config).await
    }

    /// Starts a server from an explicit configuration.
    pub async fn with_config(mut config: ServerConfig) -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("bms_http=debug,bms_auth=debug")
            .try_init();

        // Find available port for server
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let server_port = listener.local_addr()?.port();
        drop(listener);

        config.host = "127.0.0.1".to_string();
        config.port = server_port;
        let base_url = format!("http://127.0.0.1:{}", server_port);

        // Create shutdown channel
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        // Start server
        let server = Server::new(config)?;
        tokio::spawn(async move {
            tokio::select! {
                result = server.run() => {
                    if let Err(e) = result {
                        tracing::error!("Server error: {}", e);
                    }
                }
                _ = shutdown_rx => {
                    tracing::info!("Server shutdown requested");
                }
            }
        });

        // Wait for server
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        wait_for_server(&client, &base_url).await?;

        Ok(Self {
            base_url,
            client,
            _shutdown_tx,
        })
    }

    /// Returns an absolute URL for a server path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Builds a client that keeps cookies between requests.
    pub fn cookie_client(&self) -> anyhow::Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(30))
            .cookie_store(true)
            .build()?)
    }

    /// Registers an account and returns the created principal.
    pub async fn register(
        &self,
        identifier: &str,
        password: &str,
        role: Option<&str>,
    ) -> anyhow::Result<Value> {
        let mut body = json!({ "identifier": identifier, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }

        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&body)
            .send()
            .await?;
        anyhow::ensure!(
            response.status() == StatusCode::CREATED,
            "registration of {} failed with status {}",
            identifier,
            response.status()
        );
        Ok(response.json().await?)
    }

    /// Submits a login request and returns the raw response.
    pub async fn login(&self, identifier: &str, password: &str) -> anyhow::Result<Response> {
        Ok(self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await?)
    }

    /// Logs in and extracts the issued credential.
    pub async fn login_token(&self, identifier: &str, password: &str) -> anyhow::Result<String> {
        let response = self.login(identifier, password).await?;
        anyhow::ensure!(
            response.status() == StatusCode::OK,
            "login of {} failed with status {}",
            identifier,
            response.status()
        );

        let body: Value = response.json().await?;
        body["token"]
            .as_str()
            .map(ToString::to_string)
            .ok_or_else(|| anyhow::anyhow!("login response carried no token: {}", body))
    }

    /// Sends an authenticated GET request.
    pub async fn get_authed(&self, path: &str, credential: &str) -> anyhow::Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(credential)
            .send()
            .await?)
    }

    /// Sends an authenticated POST request without a body.
    pub async fn post_authed(&self, path: &str, credential: &str) -> anyhow::Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(credential)
            .send()
            .await?)
    }

    /// Sends an authenticated POST request with a JSON body.
    pub async fn post_json_authed(
        &self,
        path: &str,
        credential: &str,
        body: &Value,
    ) -> anyhow::Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(credential)
            .json(body)
            .send()
            .await?)
    }

    /// Sends an authenticated PUT request with a JSON body.
    pub async fn put_json_authed(
        &self,
        path: &str,
        credential: &str,
        body: &Value,
    ) -> anyhow::Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(credential)
            .json(body)
            .send()
            .await?)
    }
}

/// Computes the current TOTP code for a base32 secret.
pub fn current_code(secret: &str) -> anyhow::Result<String> {
    let raw = totp::decode_secret(secret)
        .ok_or_else(|| anyhow::anyhow!("enrollment secret is not valid base32"))?;
    Ok(TotpVerifier::generate(&raw, &TotpConfig::default())?)
}

/// Returns a six-digit code that does not match the current step.
pub fn wrong_code(secret: &str) -> anyhow::Result<String> {
    let current = current_code(secret)?;
    Ok(if current == "000000" {
        "000001".to_string()
    } else {
        "000000".to_string()
    })
}

/// Waits for the server to be ready.
async fn wait_for_server(client: &Client, base_url: &str) -> anyhow::Result<()> {
    let health_url = format!("{}/health", base_url);
    let max_attempts = 50;

    for attempt in 1..=max_attempts {
        match client.get(&health_url).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!("Server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(response) => {
                tracing::debug!(
                    "Server not ready (status {}), attempt {}/{}",
                    response.status(),
                    attempt,
                    max_attempts
                );
            }
            Err(e) => {
                tracing::debug!(
                    "Server not ready ({}), attempt {}/{}",
                    e,
                    attempt,
                    max_attempts
                );
            }
        }
        sleep(Duration::from_millis(100)).await;
    }

    anyhow::bail!("Server did not become ready in time")
}
