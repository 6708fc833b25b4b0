//! User sync and admin integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Sync
// ============================================================================

#[tokio::test]
async fn first_sync_creates_user_with_default_role() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/users/sync")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "handle": "kaz" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["created"], true);
    assert_eq!(body["user"]["handle"], "kaz");
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test]
async fn second_sync_updates_existing_user() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/users/sync")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "handle": "kaz-the-second" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["created"], false);
    assert_eq!(body["user"]["handle"], "kaz-the-second");
}

#[tokio::test]
async fn sync_without_handle_generates_one() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/users/sync")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let handle = body["user"]["handle"].as_str().unwrap();
    assert!(handle.starts_with("player-"));
}

#[tokio::test]
async fn sync_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/api/users/sync")
        .json(&json!({}))
        .await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Admin: list users
// ============================================================================

#[tokio::test]
async fn admin_lists_users_with_roles() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .get("/api/admin/users")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    let users = body["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert!(users
        .iter()
        .any(|user| user["role"] == "admin" && user["handle"] == "overseer"));
}

#[tokio::test]
async fn non_admin_gets_403_with_empty_user_list() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .get("/api/admin/users")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["users"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn admin_list_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/admin/users").await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Admin: role change
// ============================================================================

#[tokio::test]
async fn admin_promotes_user() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/users/role")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "userId": harness.test_user_id.to_string(),
            "role": "admin"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["user"]["role"], "admin");

    // The promoted user can now use admin endpoints
    harness
        .server
        .get("/api/admin/users")
        .add_header("authorization", harness.user_auth_header())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn role_change_rejects_unknown_role() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/users/role")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "userId": harness.test_user_id.to_string(),
            "role": "overlord"
        }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn role_change_unknown_user_fails() {
    let harness = TestHarness::new();
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/users/role")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "userId": codex_core::UserId::generate().to_string(),
            "role": "admin"
        }))
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Admin: wallet grant
// ============================================================================

#[tokio::test]
async fn admin_grants_coins() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/grant")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "userId": harness.test_user_id.to_string(),
            "coins": 500,
            "reason": "launch promo"
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["wallet"]["coins"], 500);

    // The grant is on the ledger
    let events = harness
        .server
        .get("/api/progression/events?limit=1")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let events: serde_json::Value = events.json();
    assert_eq!(events["events"][0]["source"], "admin_grant");
    assert_eq!(events["events"][0]["reference_id"], "launch promo");
}

#[tokio::test]
async fn admin_grant_rejects_empty_grant() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/grant")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({ "userId": harness.test_user_id.to_string() }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn non_admin_cannot_grant() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/admin/grant")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "userId": harness.test_user_id.to_string(),
            "coins": 500
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_cannot_change_roles() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/admin/users/role")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "userId": harness.test_user_id.to_string(),
            "role": "admin"
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}
