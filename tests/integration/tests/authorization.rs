//! Role-based authorization integration tests.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::common::TestEnv;
use bms_http::ServerConfig;

/// Principal response from the me and users endpoints.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalBody {
    pub id: Uuid,
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

/// Starts a server whose MFA policy covers no roles.
///
/// Keeps administrator logins single-factor so the tests can focus on
/// route authorization.
async fn env_without_mfa() -> anyhow::Result<TestEnv> {
    let mut config = ServerConfig::for_testing();
    config.auth.mfa.required_roles = Vec::new();
    TestEnv::with_config(config).await
}

/// Tests that the user listing demands a credential before a role.
#[tokio::test]
async fn test_listing_requires_authentication() -> anyhow::Result<()> {
    let env = env_without_mfa().await?;

    let anonymous = env.client.get(env.url("/api/users")).send().await?;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = anonymous.json().await?;
    assert_eq!(error.error, "unauthenticated", "Anonymous callers never see forbidden");

    let garbage = env.get_authed("/api/users", "not-a-real-credential").await?;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Tests the role matrix for the user listing route.
#[tokio::test]
async fn test_listing_admits_only_privileged_roles() -> anyhow::Result<()> {
    let env = env_without_mfa().await?;

    let accounts = [
        ("customer@example.com", "customer"),
        ("clerk@example.com", "salesClerk"),
        ("owner@example.com", "storeOwner"),
        ("admin@example.com", "systemAdmin"),
    ];
    for (identifier, role) in accounts {
        env.register(identifier, "MatrixSecret1!", Some(role)).await?;
    }

    for (identifier, allowed) in [
        ("customer@example.com", false),
        ("clerk@example.com", false),
        ("owner@example.com", true),
        ("admin@example.com", true),
    ] {
        let token = env.login_token(identifier, "MatrixSecret1!").await?;
        let response = env.get_authed("/api/users", &token).await?;

        if allowed {
            assert_eq!(response.status(), StatusCode::OK, "{} should be admitted", identifier);
            let listing: Vec<PrincipalBody> = response.json().await?;
            assert!(listing.len() >= accounts.len(), "Listing should cover all accounts");
        } else {
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{} should be denied", identifier);
            let error: ErrorBody = response.json().await?;
            assert_eq!(error.error, "forbidden");
        }
    }

    Ok(())
}

/// Tests that only system administrators may change roles.
#[tokio::test]
async fn test_role_change_is_reserved_for_system_admin() -> anyhow::Result<()> {
    let env = env_without_mfa().await?;

    let target = env
        .register("mallory@example.com", "Mallory1!", None)
        .await?;
    let target_id = target["id"].as_str().unwrap().to_string();
    let target_token = env.login_token("mallory@example.com", "Mallory1!").await?;

    env.register("owner@example.com", "OwnerSecret1!", Some("storeOwner"))
        .await?;
    env.register("admin@example.com", "AdminSecret1!", Some("systemAdmin"))
        .await?;

    // A store owner may list users but not reassign roles
    let owner_token = env.login_token("owner@example.com", "OwnerSecret1!").await?;
    let denied = env
        .put_json_authed(
            &format!("/api/users/{}/role", target_id),
            &owner_token,
            &json!({ "role": "salesClerk" }),
        )
        .await?;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let admin_token = env.login_token("admin@example.com", "AdminSecret1!").await?;
    let changed = env
        .put_json_authed(
            &format!("/api/users/{}/role", target_id),
            &admin_token,
            &json!({ "role": "salesClerk" }),
        )
        .await?;
    assert_eq!(changed.status(), StatusCode::OK);
    let changed: PrincipalBody = changed.json().await?;
    assert_eq!(changed.role, "salesClerk");

    // The new role is visible through the target's existing session
    let me = env.get_authed("/api/auth/me", &target_token).await?;
    let me: PrincipalBody = me.json().await?;
    assert_eq!(me.role, "salesClerk");

    Ok(())
}

/// Tests that reassigning an unknown user yields not found.
#[tokio::test]
async fn test_role_change_for_unknown_user_is_not_found() -> anyhow::Result<()> {
    let env = env_without_mfa().await?;
    env.register("admin@example.com", "AdminSecret1!", Some("systemAdmin"))
        .await?;
    let token = env.login_token("admin@example.com", "AdminSecret1!").await?;

    let response = env
        .put_json_authed(
            &format!("/api/users/{}/role", Uuid::now_v7()),
            &token,
            &json!({ "role": "salesClerk" }),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let error: ErrorBody = response.json().await?;
    assert_eq!(error.error, "not_found");

    Ok(())
}

/// Tests that anonymous role changes are unauthenticated, not forbidden.
#[tokio::test]
async fn test_anonymous_role_change_is_unauthenticated() -> anyhow::Result<()> {
    let env = env_without_mfa().await?;

    let response = env
        .client
        .put(env.url(&format!("/api/users/{}/role", Uuid::now_v7())))
        .json(&json!({ "role": "salesClerk" }))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let error: ErrorBody = response.json().await?;
    assert_eq!(error.error, "unauthenticated");

    Ok(())
}
