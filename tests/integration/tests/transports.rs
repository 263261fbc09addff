//! Credential transport and configuration integration tests.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::common::TestEnv;
use bms_core::AuthConfig;
use bms_http::{Server, ServerConfig};

/// Login response from the login endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub token: Option<String>,
    pub expires_in_seconds: Option<i64>,
    pub transport: Option<String>,
}

/// Error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

/// Tests that the bearer transport issues signed stateless tokens.
#[tokio::test]
async fn test_bearer_login_issues_signed_token() -> anyhow::Result<()> {
    let env = TestEnv::bearer().await?;
    env.register("nina@example.com", "NinaSecret1!", None).await?;

    let response = env.login("nina@example.com", "NinaSecret1!").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().get(reqwest::header::SET_COOKIE).is_none(),
        "Bearer logins must not set cookies"
    );

    let body: LoginBody = response.json().await?;
    let token = body.token.expect("login should issue a token");
    assert_eq!(token.split('.').count(), 3, "Expected a JWT, got {}", token);
    assert_eq!(body.transport.as_deref(), Some("bearer"));
    assert_eq!(body.expires_in_seconds, Some(604_800), "Default lifetime is seven days");

    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::OK);

    Ok(())
}

/// Tests that logout cannot invalidate already issued bearer tokens.
#[tokio::test]
async fn test_bearer_tokens_survive_logout() -> anyhow::Result<()> {
    let env = TestEnv::bearer().await?;
    env.register("oscar@example.com", "OscarSecret1!", None).await?;
    let token = env.login_token("oscar@example.com", "OscarSecret1!").await?;

    let logout = env.post_authed("/api/auth/logout", &token).await?;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    // Stateless tokens stay valid until they expire
    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::OK);

    Ok(())
}

/// Tests that a tampered token signature is rejected.
#[tokio::test]
async fn test_tampered_bearer_token_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::bearer().await?;
    env.register("peggy@example.com", "PeggySecret1!", None).await?;
    let token = env.login_token("peggy@example.com", "PeggySecret1!").await?;

    // Flip the last character of the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let me = env.get_authed("/api/auth/me", &tampered).await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = me.json().await?;
    assert_eq!(error.error, "invalid_token");

    Ok(())
}

/// Tests that the bearer transport refuses to start without a secret.
#[tokio::test]
async fn test_bearer_transport_requires_signing_secret() -> anyhow::Result<()> {
    let mut config = ServerConfig::for_testing();
    config.auth.transport = bms_core::config::TransportKind::Bearer;
    config.auth.token.secret = None;

    let error = match Server::new(config) {
        Ok(_) => anyhow::bail!("startup should have failed without a secret"),
        Err(error) => error,
    };
    assert!(
        error.to_string().contains("signing secret"),
        "Unexpected error: {}",
        error
    );

    Ok(())
}

/// Tests that a JSON document drives transport, lifetime, and routes.
#[tokio::test]
async fn test_configuration_from_json() -> anyhow::Result<()> {
    let auth = AuthConfig::from_json_str(
        r#"{
            "transport": "bearer",
            "token": {
                "lifetime_seconds": 1234,
                "secret": "integration-signing-secret-0123456789abcdef"
            },
            "routes": [
                { "route": "users:list", "allowed": ["customer", "systemAdmin"] },
                { "route": "users:changeRole", "allowed": ["systemAdmin"] }
            ]
        }"#,
    )?;

    let config = ServerConfig {
        auth,
        ..ServerConfig::for_testing()
    };
    let env = TestEnv::with_config(config).await?;

    env.register("quinn@example.com", "QuinnSecret1!", None).await?;
    let response = env.login("quinn@example.com", "QuinnSecret1!").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: LoginBody = response.json().await?;
    assert_eq!(body.transport.as_deref(), Some("bearer"));
    assert_eq!(body.expires_in_seconds, Some(1234));

    // The custom policy admits customers to the listing
    let token = body.token.expect("login should issue a token");
    let listing = env.get_authed("/api/users", &token).await?;
    assert_eq!(listing.status(), StatusCode::OK);

    Ok(())
}

/// Tests that demo accounts are seeded on startup when enabled.
#[tokio::test]
async fn test_demo_accounts_are_seeded() -> anyhow::Result<()> {
    let mut config = ServerConfig::for_testing();
    config.seed_demo_users = true;
    let env = TestEnv::with_config(config).await?;

    let token = env.login_token("owner@bms.com", "Owner123!").await?;
    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::OK);

    let principal: serde_json::Value = me.json().await?;
    assert_eq!(principal["role"], "storeOwner");

    env.login_token("clerk@bms.com", "Clerk123!").await?;

    Ok(())
}
