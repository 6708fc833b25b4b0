//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{decks, health, progression, store, trials, users};
use crate::state::AppState;

// ============================================================================
// Concurrency Limiting Constants
// ============================================================================

/// Maximum concurrent requests for progression mutation endpoints.
/// These are the hot path during tournaments.
const PROGRESSION_MAX_CONCURRENT_REQUESTS: usize = 100;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Progression (JWT auth)
/// - `POST /api/progression/battle-victory` - Apply the battle-win reward
/// - `POST /api/progression/cards/discard` - Discard held cards
/// - `GET /api/progression/overview` - Aggregate progression + wallet
/// - `GET /api/progression/events` - Recent ledger rows
///
/// ## Codex Trials (JWT auth)
/// - `POST /api/codex-trials/award-card` - Grant a card
/// - `POST /api/codex-trials/claim-pack` - Claim a league pack once
/// - `GET /api/codex-trials/claimed-leagues` - Claimed leagues (fails open)
///
/// ## Store, collection, decks (JWT auth)
/// - `GET /api/store/packs` / `POST /api/store/purchase`
/// - `GET /api/collection`
/// - `GET|POST /api/decks`, `POST|DELETE /api/decks/:deck_id/cards`
///
/// ## Users & admin
/// - `POST /api/users/sync` - Upsert logged-in user from session
/// - `GET /api/admin/users`, `POST /api/admin/users/role`,
///   `POST /api/admin/grant`, `POST /api/admin/packs` - Admin role required
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    // Progression mutations get their own concurrency limit: they are the
    // hot path and must not starve the rest of the API.
    let progression_routes = Router::new()
        .route("/battle-victory", post(progression::battle_victory))
        .route("/cards/discard", post(progression::discard_card))
        .route("/overview", get(progression::overview))
        .route("/events", get(progression::list_events))
        .layer(ConcurrencyLimitLayer::new(
            PROGRESSION_MAX_CONCURRENT_REQUESTS,
        ));

    let api_routes = Router::new()
        // Codex Trials
        .route("/codex-trials/award-card", post(trials::award_card))
        .route("/codex-trials/claim-pack", post(trials::claim_pack))
        .route("/codex-trials/claimed-leagues", get(trials::claimed_leagues))
        // Store
        .route("/store/packs", get(store::list_packs))
        .route("/store/purchase", post(store::purchase_pack))
        // Collection & decks
        .route("/collection", get(progression::list_collection))
        .route("/decks", get(decks::list_decks).post(decks::create_deck))
        .route(
            "/decks/:deck_id/cards",
            post(decks::add_card).delete(decks::remove_card),
        )
        // Users & admin
        .route("/users/sync", post(users::sync_user))
        .route("/admin/users", get(users::list_users))
        .route("/admin/users/role", post(users::set_role))
        .route("/admin/grant", post(users::admin_grant))
        .route("/admin/packs", post(store::admin_upsert_pack))
        // Progression routes (with their own concurrency limit)
        .nest("/progression", progression_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API routes (rate limited)
        .nest("/api", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
