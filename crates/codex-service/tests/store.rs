//! Store pack integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::json;

// ============================================================================
// Catalog
// ============================================================================

#[tokio::test]
async fn list_packs_returns_catalog_and_wallet() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    harness.seed_pack("ember-starter", 300);

    let response = harness
        .server
        .get("/api/store/packs")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let packs = body["packs"].as_array().unwrap();
    assert_eq!(packs.len(), 1);
    assert_eq!(packs[0]["id"], "ember-starter");
    assert_eq!(packs[0]["price_coins"], 300);
    assert_eq!(body["wallet"]["coins"], 0);
}

#[tokio::test]
async fn list_packs_without_sync_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/api/store/packs")
        .add_header("authorization", harness.user_auth_header())
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_packs_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/api/store/packs").await;

    response.assert_status_unauthorized();
}

// ============================================================================
// Purchase
// ============================================================================

#[tokio::test]
async fn purchase_with_insufficient_funds_fails() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    harness.seed_pack("ember-starter", 300);

    let response = harness
        .server
        .post("/api/store/purchase")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "packId": "ember-starter" }))
        .await;

    response.assert_status(StatusCode::PAYMENT_REQUIRED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn purchase_debits_wallet_and_logs_event() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;
    harness.seed_pack("ember-starter", 100);

    // Earn enough coins first: 4 victories at 25 coins each
    for _ in 0..4 {
        harness
            .server
            .post("/api/progression/battle-victory")
            .add_header("authorization", harness.user_auth_header())
            .await
            .assert_status_ok();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let response = harness
        .server
        .post("/api/store/purchase")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "packId": "ember-starter" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["wallet"]["coins"], 0);
    assert_eq!(body["pack"]["id"], "ember-starter");

    let events = harness
        .server
        .get("/api/progression/events?limit=1")
        .add_header("authorization", harness.user_auth_header())
        .await;
    let events: serde_json::Value = events.json();
    let rows = events["events"].as_array().unwrap();
    assert_eq!(rows[0]["source"], "pack_purchase");
    assert_eq!(rows[0]["coin_delta"], -100);
    assert_eq!(rows[0]["reference_id"], "store-pack:ember-starter");
}

#[tokio::test]
async fn purchase_unknown_pack_fails() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/store/purchase")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({ "packId": "missing" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn purchase_missing_pack_id_fails() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/store/purchase")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({}))
        .await;

    response.assert_status_bad_request();
}

// ============================================================================
// Admin pack upsert
// ============================================================================

#[tokio::test]
async fn admin_can_upsert_pack() {
    let harness = TestHarness::new();
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/packs")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "id": "fire-league",
            "name": "Fire League Pack",
            "league": "fire",
            "priceDiamonds": 10,
            "cardCount": 8
        }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["pack"]["league"], "fire");
    assert_eq!(body["pack"]["price_diamonds"], 10);
}

#[tokio::test]
async fn non_admin_cannot_upsert_pack() {
    let harness = TestHarness::new();
    harness.sync_test_user().await;

    let response = harness
        .server
        .post("/api/admin/packs")
        .add_header("authorization", harness.user_auth_header())
        .json(&json!({
            "id": "fire-league",
            "name": "Fire League Pack",
            "cardCount": 8
        }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_upsert_rejects_zero_card_count() {
    let harness = TestHarness::new();
    let admin_id = harness.seed_admin();

    let response = harness
        .server
        .post("/api/admin/packs")
        .add_header("authorization", TestHarness::auth_header_for(&admin_id))
        .json(&json!({
            "id": "empty",
            "name": "Empty Pack",
            "cardCount": 0
        }))
        .await;

    response.assert_status_bad_request();
}
