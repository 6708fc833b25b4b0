//! Progression and collection handlers.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use codex_core::{
    CardRef, CardType, ProgressionEvent, ProgressionState, Rarity, UserCard, Wallet,
};
use codex_store::Store;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::progression::{MutationResponse, ProgressionDto, WalletDto};
use crate::state::AppState;

/// Apply the fixed battle-victory reward to the calling user.
pub async fn battle_victory(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<MutationResponse>, ApiError> {
    let event = ProgressionEvent::battle_victory(auth.user_id);
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        xp = %event.xp_delta,
        coins = %event.coin_delta,
        "Battle victory applied"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Card discard request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscardRequest {
    /// Catalog the card belongs to.
    pub card_type: Option<String>,
    /// Catalog card id.
    pub card_id: Option<String>,
    /// Card rarity, determines the sell-value refund.
    pub rarity: Option<String>,
    /// Copies to discard (default: 1).
    pub quantity: Option<i64>,
}

/// Discard copies of a held card for their sell value.
pub async fn discard_card(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<DiscardRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let card = parse_card_ref(body.card_type.as_deref(), body.card_id.as_deref())?;
    let rarity: Rarity = body
        .rarity
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("missing rarity".into()))?
        .parse()?;
    let quantity = parse_quantity(body.quantity)?;

    let refund = rarity.sell_value_coins() * quantity;
    let event = ProgressionEvent::card_discarded(auth.user_id, card, quantity, refund);
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        card_id = %card.card_id,
        quantity = %quantity,
        refund = %refund,
        "Card discarded"
    );

    Ok(Json(MutationResponse::applied(
        event.id.to_string(),
        progression,
        wallet,
    )))
}

/// Aggregate progression response.
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// Progression aggregate.
    pub progression: ProgressionDto,
    /// Wallet balances.
    pub wallet: WalletDto,
    /// Total copies held across the collection.
    pub collection_size: i64,
}

/// Read the calling user's aggregate progression.
pub async fn overview(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<OverviewResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {}", auth.user_id)))?;

    let progression = state
        .store
        .get_progression(&user.id)?
        .unwrap_or_else(|| ProgressionState::new(user.id));
    let wallet = state
        .store
        .get_wallet(&user.id)?
        .unwrap_or_else(|| Wallet::new(user.id));
    let collection_size = state
        .store
        .list_user_cards(&user.id)?
        .iter()
        .map(|holding| holding.quantity)
        .sum();

    Ok(Json(OverviewResponse {
        success: true,
        progression: progression.into(),
        wallet: wallet.into(),
        collection_size,
    }))
}

/// Event listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    /// Maximum number of events to return (default: 50).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

/// One ledger row in a listing response.
#[derive(Debug, Serialize)]
pub struct EventDto {
    /// Event id.
    pub id: String,
    /// Event source.
    pub source: String,
    /// XP applied.
    pub xp_delta: i64,
    /// Coins applied.
    pub coin_delta: i64,
    /// Diamonds applied.
    pub diamond_delta: i64,
    /// Card change, when the event touched a holding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card: Option<CardChangeDto>,
    /// Reference id, when supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Timestamp (RFC 3339).
    pub created_at: String,
}

/// Card change inside an event listing.
#[derive(Debug, Serialize)]
pub struct CardChangeDto {
    /// Catalog the card belongs to.
    pub card_type: String,
    /// Catalog card id.
    pub card_id: String,
    /// Copies added or removed.
    pub quantity_delta: i64,
}

impl From<&ProgressionEvent> for EventDto {
    fn from(event: &ProgressionEvent) -> Self {
        Self {
            id: event.id.to_string(),
            source: event.source.as_str().to_string(),
            xp_delta: event.xp_delta,
            coin_delta: event.coin_delta,
            diamond_delta: event.diamond_delta,
            card: event.card.as_ref().map(|change| CardChangeDto {
                card_type: change.card.card_type.as_str().to_string(),
                card_id: change.card.card_id.to_string(),
                quantity_delta: change.quantity_delta,
            }),
            reference_id: event.reference_id.clone(),
            created_at: event.created_at.to_rfc3339(),
        }
    }
}

/// Event listing response.
#[derive(Debug, Serialize)]
pub struct ListEventsResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// Events, newest first.
    pub events: Vec<EventDto>,
    /// Whether more events exist past this page.
    pub has_more: bool,
}

/// List the calling user's recent ledger rows.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListEventsResponse>, ApiError> {
    // Fetch one more than requested to determine has_more
    let limit = query.limit.min(100);
    let events = state
        .store
        .list_events_by_user(&auth.user_id, limit + 1, query.offset)?;

    let has_more = events.len() > limit;
    let events: Vec<_> = events.iter().take(limit).map(EventDto::from).collect();

    Ok(Json(ListEventsResponse {
        success: true,
        events,
        has_more,
    }))
}

/// One holding in a collection response.
#[derive(Debug, Serialize)]
pub struct UserCardDto {
    /// Catalog the card belongs to.
    pub card_type: String,
    /// Catalog card id.
    pub card_id: String,
    /// Copies held.
    pub quantity: i64,
}

impl From<&UserCard> for UserCardDto {
    fn from(holding: &UserCard) -> Self {
        Self {
            card_type: holding.card_type.as_str().to_string(),
            card_id: holding.card_id.to_string(),
            quantity: holding.quantity,
        }
    }
}

/// Collection listing response.
#[derive(Debug, Serialize)]
pub struct CollectionResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// Held cards.
    pub cards: Vec<UserCardDto>,
}

/// List the calling user's card holdings.
pub async fn list_collection(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<CollectionResponse>, ApiError> {
    let cards = state
        .store
        .list_user_cards(&auth.user_id)?
        .iter()
        .map(UserCardDto::from)
        .collect();

    Ok(Json(CollectionResponse {
        success: true,
        cards,
    }))
}

// Helper functions

/// Parse the card discriminator fields shared by card mutations.
///
/// Fails closed: both fields are required, unknown card types are rejected.
pub(crate) fn parse_card_ref(
    card_type: Option<&str>,
    card_id: Option<&str>,
) -> Result<CardRef, ApiError> {
    let card_type: CardType = card_type
        .ok_or_else(|| ApiError::BadRequest("missing cardType".into()))?
        .parse()?;
    let card_id = card_id
        .ok_or_else(|| ApiError::BadRequest("missing cardId".into()))?
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid cardId".into()))?;

    Ok(CardRef::new(card_type, card_id))
}

/// Parse an optional quantity, defaulting to 1.
pub(crate) fn parse_quantity(quantity: Option<i64>) -> Result<i64, ApiError> {
    let quantity = quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(ApiError::BadRequest(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    Ok(quantity)
}
