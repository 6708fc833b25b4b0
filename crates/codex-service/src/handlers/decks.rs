//! Deck handlers.
//!
//! Moving a card between the collection and a deck mutates both rows and
//! logs one progression event, so the ledger invariant holds for deck
//! assembly as well.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use codex_core::{Deck, DeckId, ProgressionEvent};
use codex_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::handlers::progression::{parse_card_ref, parse_quantity};
use crate::progression::MutationResponse;
use crate::state::AppState;

/// One deck in a listing response.
#[derive(Debug, Serialize)]
pub struct DeckDto {
    /// Deck id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Total copies assigned to the deck.
    pub card_count: i64,
}

/// Deck listing response.
#[derive(Debug, Serialize)]
pub struct ListDecksResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// The caller's decks.
    pub decks: Vec<DeckDto>,
}

/// List the calling user's decks.
pub async fn list_decks(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ListDecksResponse>, ApiError> {
    let mut decks = Vec::new();
    for deck in state.store.list_decks_by_user(&auth.user_id)? {
        let card_count = state
            .store
            .list_deck_cards(&deck.id)?
            .iter()
            .map(|assignment| assignment.quantity)
            .sum();
        decks.push(DeckDto {
            id: deck.id.to_string(),
            name: deck.name,
            card_count,
        });
    }

    Ok(Json(ListDecksResponse {
        success: true,
        decks,
    }))
}

/// Deck creation request.
#[derive(Debug, Deserialize)]
pub struct CreateDeckRequest {
    /// Display name.
    pub name: Option<String>,
}

/// Deck creation response.
#[derive(Debug, Serialize)]
pub struct CreateDeckResponse {
    /// Whether the deck was created.
    pub success: bool,
    /// The new deck.
    pub deck: DeckDto,
}

/// Create an empty deck.
pub async fn create_deck(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<CreateDeckRequest>,
) -> Result<Json<CreateDeckResponse>, ApiError> {
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing name".into()))?;

    let deck = Deck::new(auth.user_id, name.to_string());
    state.store.put_deck(&deck)?;

    tracing::info!(user_id = %auth.user_id, deck_id = %deck.id, "Deck created");

    Ok(Json(CreateDeckResponse {
        success: true,
        deck: DeckDto {
            id: deck.id.to_string(),
            name: deck.name,
            card_count: 0,
        },
    }))
}

/// Deck card move request, shared by add and remove.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckCardRequest {
    /// Catalog the card belongs to.
    pub card_type: Option<String>,
    /// Catalog card id.
    pub card_id: Option<String>,
    /// Copies to move (default: 1).
    pub quantity: Option<i64>,
}

/// Move copies of a held card into a deck.
pub async fn add_card(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(deck_id): Path<String>,
    Json(body): Json<DeckCardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let (deck, card, quantity) = resolve_move(&state, &auth, &deck_id, &body)?;

    let event = ProgressionEvent::deck_assembly(auth.user_id, &deck.id, card, quantity);
    let (progression, wallet) = state.store.apply_deck_move(&event, &deck.id)?;

    tracing::info!(
        user_id = %auth.user_id,
        deck_id = %deck.id,
        card_id = %card.card_id,
        quantity = %quantity,
        "Card moved into deck"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Move copies of a deck card back into the collection.
pub async fn remove_card(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(deck_id): Path<String>,
    Json(body): Json<DeckCardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let (deck, card, quantity) = resolve_move(&state, &auth, &deck_id, &body)?;

    let event = ProgressionEvent::deck_removal(auth.user_id, &deck.id, card, quantity);
    let (progression, wallet) = state.store.apply_deck_move(&event, &deck.id)?;

    tracing::info!(
        user_id = %auth.user_id,
        deck_id = %deck.id,
        card_id = %card.card_id,
        quantity = %quantity,
        "Card moved out of deck"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Validate a deck move: the deck must exist and belong to the caller.
///
/// Decks of other users are reported as not found rather than forbidden,
/// so deck ids don't leak across accounts.
fn resolve_move(
    state: &AppState,
    auth: &AuthUser,
    deck_id: &str,
    body: &DeckCardRequest,
) -> Result<(Deck, codex_core::CardRef, i64), ApiError> {
    let deck_id: DeckId = deck_id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid deck id".into()))?;
    let card = parse_card_ref(body.card_type.as_deref(), body.card_id.as_deref())?;
    let quantity = parse_quantity(body.quantity)?;

    let deck = state
        .store
        .get_deck(&deck_id)?
        .filter(|deck| deck.user_id == auth.user_id)
        .ok_or_else(|| ApiError::NotFound(format!("deck not found: {deck_id}")))?;

    Ok((deck, card, quantity))
}
