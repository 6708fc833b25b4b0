//! Codex Trials handlers: card awards and league pack claims.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use codex_core::{ProgressionEvent, Rarity};
use codex_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::progression::{parse_card_ref, parse_quantity};
use crate::progression::{is_claimed, MutationResponse};
use crate::state::AppState;

/// Card award request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardCardRequest {
    /// Catalog the card belongs to.
    pub card_type: Option<String>,
    /// Catalog card id.
    pub card_id: Option<String>,
    /// Card rarity.
    pub rarity: Option<String>,
    /// Copies to award (default: 1).
    pub quantity: Option<i64>,
    /// Caller-supplied reference id recorded on the ledger row.
    pub reference_id: Option<String>,
}

/// Grant a card to the calling user.
pub async fn award_card(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<AwardCardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let card = parse_card_ref(body.card_type.as_deref(), body.card_id.as_deref())?;
    let rarity: Rarity = body
        .rarity
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing rarity".into()))?
        .parse()?;
    let quantity = parse_quantity(body.quantity)?;

    let event = ProgressionEvent::card_awarded(auth.user_id, card, quantity, body.reference_id);
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        card_id = %card.card_id,
        rarity = %rarity.as_str(),
        quantity = %quantity,
        "Card awarded"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// League pack claim request.
#[derive(Debug, Deserialize)]
pub struct ClaimPackRequest {
    /// League whose pack is being claimed.
    pub league: Option<String>,
}

/// Claim the pack unlocked by completing a league, at most once.
///
/// Idempotency is derived from the event ledger: the claim is rejected if
/// a matching claim reference appears within the scan window.
pub async fn claim_pack(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<ClaimPackRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let league = body
        .league
        .as_deref()
        .map(str::trim)
        .filter(|league| !league.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing league".into()))?;

    // The read path may have failed open; re-run the scan before granting.
    if is_claimed(&state.store, &auth.user_id, league) {
        return Err(ApiError::AlreadyClaimed(league.to_ascii_lowercase()));
    }

    let event = ProgressionEvent::pack_claim(auth.user_id, league);
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        league = %league,
        "League pack claimed"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Claimed leagues response.
#[derive(Debug, Serialize)]
pub struct ClaimedLeaguesResponse {
    /// Always true; this endpoint fails open.
    pub success: bool,
    /// Leagues with a claim within the scan window, newest first.
    pub leagues: Vec<String>,
}

/// List the leagues whose packs the calling user has claimed.
///
/// Always returns 200; an unauthenticated caller or a storage error
/// yields an empty list rather than an error.
pub async fn claimed_leagues(
    State(state): State<Arc<AppState>>,
    auth: Result<AuthUser, ApiError>,
) -> Json<ClaimedLeaguesResponse> {
    let leagues = match auth {
        Ok(auth) => crate::progression::claimed_leagues(&state.store, &auth.user_id),
        Err(_) => Vec::new(),
    };

    Json(ClaimedLeaguesResponse {
        success: true,
        leagues,
    })
}
