//! Authentication flow integration tests.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::TestEnv;

/// Login response from the login endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub token: Option<String>,
    pub expires_in_seconds: Option<i64>,
    pub transport: Option<String>,
    pub mfa_required: Option<bool>,
    pub ticket: Option<String>,
    pub mfa_enrollment_required: Option<bool>,
}

/// Principal response from the me and users endpoints.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalBody {
    pub id: uuid::Uuid,
    pub identifier: String,
    pub role: String,
    pub mfa_enabled: bool,
}

/// Error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

/// Tests registration, login, and principal resolution end-to-end.
#[tokio::test]
async fn test_register_login_and_current_principal() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    // Identifier is trimmed and lowercased on the way in
    let created = env
        .register("  Alice@Example.COM  ", "CorrectHorse1!", None)
        .await?;
    assert_eq!(created["identifier"], "alice@example.com");
    assert_eq!(created["role"], "customer", "New accounts get the lowest role");

    let response = env.login("alice@example.com", "CorrectHorse1!").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: LoginBody = response.json().await?;
    let token = body.token.expect("login should issue a credential");
    assert_eq!(body.transport.as_deref(), Some("session"));
    assert_eq!(body.expires_in_seconds, Some(3600));
    assert!(body.mfa_required.is_none(), "Customers face no MFA challenge");
    assert!(body.ticket.is_none());

    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::OK);

    let principal: PrincipalBody = me.json().await?;
    assert_eq!(principal.id.to_string(), created["id"].as_str().unwrap());
    assert_eq!(principal.identifier, "alice@example.com");
    assert_eq!(principal.role, "customer");
    assert!(!principal.mfa_enabled);

    Ok(())
}

/// Tests that wrong passwords and unknown identifiers fail identically.
#[tokio::test]
async fn test_credential_failures_are_indistinguishable() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("bob@example.com", "BobSecret1!", None).await?;

    let wrong_password = env.login("bob@example.com", "NotBobsPassword1!").await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert!(
        wrong_password.headers().get(reqwest::header::SET_COOKIE).is_none(),
        "Failed logins must not set a session cookie"
    );
    let wrong_password: ErrorBody = wrong_password.json().await?;

    let unknown_user = env.login("nobody@example.com", "NotBobsPassword1!").await?;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: ErrorBody = unknown_user.json().await?;

    // Neither response may reveal which part of the credential failed
    assert_eq!(wrong_password.error, "invalid_credentials");
    assert_eq!(unknown_user.error, wrong_password.error);
    assert_eq!(unknown_user.error_description, wrong_password.error_description);

    Ok(())
}

/// Tests that a taken identifier conflicts regardless of case.
#[tokio::test]
async fn test_duplicate_registration_conflicts() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("carol@example.com", "CarolSecret1!", None).await?;

    let response = env
        .client
        .post(env.url("/api/auth/register"))
        .json(&json!({ "identifier": "CAROL@Example.com", "password": "OtherSecret1!" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorBody = response.json().await?;
    assert_eq!(body.error, "duplicate_identifier");

    Ok(())
}

/// Tests that short passwords are rejected at registration.
#[tokio::test]
async fn test_short_password_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let response = env
        .client
        .post(env.url("/api/auth/register"))
        .json(&json!({ "identifier": "dan@example.com", "password": "Short1!" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = response.json().await?;
    assert_eq!(body.error, "weak_password");
    assert_eq!(
        body.error_description.as_deref(),
        Some("password must be at least 8 characters")
    );

    Ok(())
}

/// Tests that repeated failures lock out further attempts.
#[tokio::test]
async fn test_rate_limit_blocks_even_correct_credentials() -> anyhow::Result<()> {
    let mut config = bms_http::ServerConfig::for_testing();
    config.auth.rate_limit.max_attempts = 3;
    let env = TestEnv::with_config(config).await?;

    env.register("eve@example.com", "EveSecret1!", None).await?;

    for _ in 0..3 {
        let response = env.login("eve@example.com", "WrongSecret1!").await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // The window is full, so even the right password is throttled
    let response = env.login("eve@example.com", "EveSecret1!").await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(
        response.headers().get(reqwest::header::RETRY_AFTER).is_some(),
        "Throttled responses should carry Retry-After"
    );

    let body: ErrorBody = response.json().await?;
    assert_eq!(body.error, "too_many_attempts");

    Ok(())
}

/// Tests that logout revokes the session credential.
#[tokio::test]
async fn test_logout_revokes_session_credential() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("frank@example.com", "FrankSecret1!", None).await?;
    let token = env.login_token("frank@example.com", "FrankSecret1!").await?;

    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::OK);

    let logout = env.post_authed("/api/auth/logout", &token).await?;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = env.get_authed("/api/auth/me", &token).await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED, "Revoked sessions must not resolve");

    Ok(())
}

/// Tests the browser-style cookie flow from login to logout.
#[tokio::test]
async fn test_session_cookie_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("grace@example.com", "GraceSecret1!", None).await?;

    let browser = env.cookie_client()?;

    let login = browser
        .post(env.url("/api/auth/login"))
        .json(&json!({ "identifier": "grace@example.com", "password": "GraceSecret1!" }))
        .send()
        .await?;
    assert_eq!(login.status(), StatusCode::OK);

    let cookie = login
        .headers()
        .get(reqwest::header::SET_COOKIE)
        .expect("session login should set a cookie")
        .to_str()?;
    assert!(cookie.starts_with("bms_session="), "Unexpected cookie: {}", cookie);
    assert!(cookie.contains("HttpOnly"), "Session cookie must be HttpOnly");

    // The cookie jar alone authenticates follow-up requests
    let me = browser.get(env.url("/api/auth/me")).send().await?;
    assert_eq!(me.status(), StatusCode::OK);
    let principal: PrincipalBody = me.json().await?;
    assert_eq!(principal.identifier, "grace@example.com");

    let logout = browser.post(env.url("/api/auth/logout")).send().await?;
    assert_eq!(logout.status(), StatusCode::NO_CONTENT);

    let me = browser.get(env.url("/api/auth/me")).send().await?;
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED, "Logout should clear the cookie");

    Ok(())
}
