//! Client SDK tests against a mocked codex-service.

use codex_client::{AwardCardRequest, ClientError, CodexClient};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mutation_body() -> serde_json::Value {
    json!({
        "success": true,
        "event_id": "01J8ZD1T3E4R5T6Y7U8I9O0P1Q",
        "progression": {
            "xp_total": 50,
            "level": 1,
            "level_floor_xp": 0,
            "next_level_xp": 100
        },
        "wallet": { "coins": 25, "diamonds": 0 }
    })
}

#[tokio::test]
async fn battle_victory_roundtrip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/progression/battle-victory"))
        .and(header("authorization", "Bearer session-jwt"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mutation_body()))
        .mount(&server)
        .await;

    let client = CodexClient::new(server.uri());
    let response = client.report_battle_victory("session-jwt").await.unwrap();

    assert!(response.success);
    assert_eq!(response.wallet.coins, 25);
    assert_eq!(response.progression.xp_total, 50);
}

#[tokio::test]
async fn award_card_sends_camel_case_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/codex-trials/award-card"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mutation_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = CodexClient::new(server.uri());
    let response = client
        .award_card(
            "session-jwt",
            AwardCardRequest {
                card_type: "creature".into(),
                card_id: "8c4d2f3a-9b1e-4c5d-8e7f-1a2b3c4d5e6f".into(),
                rarity: "rare".into(),
                quantity: Some(2),
                reference_id: None,
            },
        )
        .await
        .unwrap();

    assert!(response.success);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = requests[0].body_json().unwrap();
    assert_eq!(body["cardType"], "creature");
    assert_eq!(body["quantity"], 2);
    assert!(body.get("referenceId").is_none());
}

#[tokio::test]
async fn insufficient_funds_maps_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/progression/battle-victory"))
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "success": false,
            "error": "insufficient coins: balance=0, required=300"
        })))
        .mount(&server)
        .await;

    let client = CodexClient::new(server.uri());
    let result = client.report_battle_victory("session-jwt").await;

    assert!(matches!(result, Err(ClientError::InsufficientFunds(_))));
}

#[tokio::test]
async fn unauthorized_maps_to_typed_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/progression/overview"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "error": "unauthorized"
        })))
        .mount(&server)
        .await;

    let client = CodexClient::new(server.uri());
    let result = client.overview("bad-jwt").await;

    assert!(matches!(result, Err(ClientError::Unauthorized(_))));
}

#[tokio::test]
async fn claimed_leagues_roundtrip() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/codex-trials/claimed-leagues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "leagues": ["water", "fire"]
        })))
        .mount(&server)
        .await;

    let client = CodexClient::new(server.uri());
    let response = client.claimed_leagues("session-jwt").await.unwrap();

    assert_eq!(response.leagues, vec!["water", "fire"]);
}
