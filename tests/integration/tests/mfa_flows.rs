//! Multi-factor enrollment and challenge integration tests.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::{current_code, wrong_code, TestEnv};

/// Login response from the login endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginBody {
    pub token: Option<String>,
    pub transport: Option<String>,
    pub mfa_required: Option<bool>,
    pub ticket: Option<String>,
    pub mfa_enrollment_required: Option<bool>,
}

/// Credential response from the challenge endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialBody {
    pub token: String,
    pub expires_in_seconds: i64,
    pub transport: String,
}

/// Enrollment response from the setup endpoint.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentBody {
    pub secret: String,
    pub provisioning_uri: String,
}

/// Error response.
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub error_description: Option<String>,
}

/// Registers a system administrator and completes MFA enrollment.
///
/// Returns the confirmed authenticator secret.
async fn enroll(env: &TestEnv, identifier: &str, password: &str) -> anyhow::Result<String> {
    env.register(identifier, password, Some("systemAdmin")).await?;
    let token = env.login_token(identifier, password).await?;

    let setup = env.post_authed("/api/mfa/setup", &token).await?;
    anyhow::ensure!(setup.status() == StatusCode::OK, "setup failed: {}", setup.status());
    let enrollment: EnrollmentBody = setup.json().await?;

    let confirm = env
        .post_json_authed(
            "/api/mfa/confirm",
            &token,
            &json!({ "secret": enrollment.secret, "code": current_code(&enrollment.secret)? }),
        )
        .await?;
    anyhow::ensure!(
        confirm.status() == StatusCode::NO_CONTENT,
        "confirm failed: {}",
        confirm.status()
    );

    Ok(enrollment.secret)
}

/// Tests that an unenrolled admin is admitted but told to enroll.
#[tokio::test]
async fn test_admin_without_enrollment_is_flagged() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("harriet@example.com", "Harriet1!", Some("systemAdmin"))
        .await?;

    let response = env.login("harriet@example.com", "Harriet1!").await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body: LoginBody = response.json().await?;
    assert!(body.token.is_some(), "Unenrolled admins still authenticate");
    assert_eq!(body.mfa_enrollment_required, Some(true));
    assert!(body.mfa_required.is_none(), "No challenge without a confirmed secret");
    assert!(body.ticket.is_none());

    Ok(())
}

/// Tests the full enrollment and challenge lifecycle.
#[tokio::test]
async fn test_enrollment_and_challenge_round_trip() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("heidi@example.com", "HeidiSecret1!", Some("systemAdmin"))
        .await?;
    let first_token = env.login_token("heidi@example.com", "HeidiSecret1!").await?;

    // Generate an authenticator secret
    let setup = env.post_authed("/api/mfa/setup", &first_token).await?;
    assert_eq!(setup.status(), StatusCode::OK);
    let enrollment: EnrollmentBody = setup.json().await?;
    assert!(
        enrollment.provisioning_uri.starts_with("otpauth://totp/BMS"),
        "Unexpected URI: {}",
        enrollment.provisioning_uri
    );
    assert!(enrollment.provisioning_uri.contains("issuer=BMS"));
    assert!(enrollment
        .provisioning_uri
        .contains(&format!("secret={}", enrollment.secret)));
    assert!(enrollment.provisioning_uri.contains("period=30"));

    // Prove possession of the secret to activate it
    let confirm = env
        .post_json_authed(
            "/api/mfa/confirm",
            &first_token,
            &json!({ "secret": enrollment.secret, "code": current_code(&enrollment.secret)? }),
        )
        .await?;
    assert_eq!(confirm.status(), StatusCode::NO_CONTENT);

    // From now on, a password alone is not enough
    let response = env.login("heidi@example.com", "HeidiSecret1!").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: LoginBody = response.json().await?;
    assert_eq!(body.mfa_required, Some(true));
    assert!(body.token.is_none(), "No credential before the second factor");
    let ticket = body.ticket.expect("challenge should carry a ticket");

    let verify = env
        .client
        .post(env.url("/api/auth/login/mfa"))
        .json(&json!({ "ticket": ticket, "code": current_code(&enrollment.secret)? }))
        .send()
        .await?;
    assert_eq!(verify.status(), StatusCode::OK);
    let credential: CredentialBody = verify.json().await?;
    assert_eq!(credential.transport, "session");

    let me = env.get_authed("/api/auth/me", &credential.token).await?;
    assert_eq!(me.status(), StatusCode::OK);
    let principal: serde_json::Value = me.json().await?;
    assert_eq!(principal["role"], "systemAdmin");
    assert_eq!(principal["mfaEnabled"], true);

    Ok(())
}

/// Tests that wrong codes are rejected without consuming the challenge.
#[tokio::test]
async fn test_wrong_codes_leave_the_challenge_pending() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let secret = enroll(&env, "ivan@example.com", "IvanSecret1!").await?;

    let response = env.login("ivan@example.com", "IvanSecret1!").await?;
    let body: LoginBody = response.json().await?;
    let ticket = body.ticket.expect("challenge should carry a ticket");

    for _ in 0..3 {
        let verify = env
            .client
            .post(env.url("/api/auth/login/mfa"))
            .json(&json!({ "ticket": ticket, "code": wrong_code(&secret)? }))
            .send()
            .await?;
        assert_eq!(verify.status(), StatusCode::UNAUTHORIZED);

        let error: ErrorBody = verify.json().await?;
        assert_eq!(error.error, "invalid_mfa_code");
    }

    // The same ticket still accepts the right code
    let verify = env
        .client
        .post(env.url("/api/auth/login/mfa"))
        .json(&json!({ "ticket": ticket, "code": current_code(&secret)? }))
        .send()
        .await?;
    assert_eq!(verify.status(), StatusCode::OK);

    Ok(())
}

/// Tests that an accepted ticket cannot be replayed.
#[tokio::test]
async fn test_used_ticket_cannot_be_replayed() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    let secret = enroll(&env, "judy@example.com", "JudySecret1!").await?;

    let response = env.login("judy@example.com", "JudySecret1!").await?;
    let body: LoginBody = response.json().await?;
    let ticket = body.ticket.expect("challenge should carry a ticket");

    let code = current_code(&secret)?;
    let verify = env
        .client
        .post(env.url("/api/auth/login/mfa"))
        .json(&json!({ "ticket": ticket, "code": code }))
        .send()
        .await?;
    assert_eq!(verify.status(), StatusCode::OK);

    let replay = env
        .client
        .post(env.url("/api/auth/login/mfa"))
        .json(&json!({ "ticket": ticket, "code": code }))
        .send()
        .await?;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = replay.json().await?;
    assert_eq!(error.error, "no_pending_mfa");

    Ok(())
}

/// Tests that verification without a login is rejected.
#[tokio::test]
async fn test_verify_without_pending_challenge_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;

    let verify = env
        .client
        .post(env.url("/api/auth/login/mfa"))
        .json(&json!({ "ticket": "no-such-ticket", "code": "123456" }))
        .send()
        .await?;
    assert_eq!(verify.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = verify.json().await?;
    assert_eq!(error.error, "no_pending_mfa");

    Ok(())
}

/// Tests that a failed confirmation leaves MFA disabled.
#[tokio::test]
async fn test_confirm_with_wrong_code_keeps_mfa_disabled() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("kate@example.com", "KateSecret1!", Some("systemAdmin"))
        .await?;
    let token = env.login_token("kate@example.com", "KateSecret1!").await?;

    let setup = env.post_authed("/api/mfa/setup", &token).await?;
    let enrollment: EnrollmentBody = setup.json().await?;

    let confirm = env
        .post_json_authed(
            "/api/mfa/confirm",
            &token,
            &json!({ "secret": enrollment.secret, "code": wrong_code(&enrollment.secret)? }),
        )
        .await?;
    assert_eq!(confirm.status(), StatusCode::UNAUTHORIZED);

    // The secret was never activated, so login stays single-factor
    let response = env.login("kate@example.com", "KateSecret1!").await?;
    let body: LoginBody = response.json().await?;
    assert!(body.token.is_some());
    assert!(body.mfa_required.is_none());
    assert_eq!(body.mfa_enrollment_required, Some(true));

    Ok(())
}

/// Tests that any enrolled account is challenged, not only admins.
#[tokio::test]
async fn test_enrolled_customer_is_challenged() -> anyhow::Result<()> {
    let env = TestEnv::new().await?;
    env.register("luke@example.com", "LukeSecret1!", None).await?;
    let token = env.login_token("luke@example.com", "LukeSecret1!").await?;

    let setup = env.post_authed("/api/mfa/setup", &token).await?;
    let enrollment: EnrollmentBody = setup.json().await?;

    let confirm = env
        .post_json_authed(
            "/api/mfa/confirm",
            &token,
            &json!({ "secret": enrollment.secret, "code": current_code(&enrollment.secret)? }),
        )
        .await?;
    assert_eq!(confirm.status(), StatusCode::NO_CONTENT);

    let response = env.login("luke@example.com", "LukeSecret1!").await?;
    let body: LoginBody = response.json().await?;
    assert_eq!(body.mfa_required, Some(true), "Enrollment drives the challenge");
    assert!(body.token.is_none());

    Ok(())
}
