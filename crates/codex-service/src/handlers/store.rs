//! Store pack handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use codex_core::{ProgressionEvent, StorePack, Wallet};
use codex_store::Store;

use crate::auth::{require_admin, AuthUser};
use crate::error::ApiError;
use crate::progression::{MutationResponse, WalletDto};
use crate::state::AppState;

/// One pack in a catalog response.
#[derive(Debug, Serialize)]
pub struct PackDto {
    /// Pack slug.
    pub id: String,
    /// Display name.
    pub name: String,
    /// League, when the pack is a league pack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub league: Option<String>,
    /// Coin price.
    pub price_coins: i64,
    /// Diamond price.
    pub price_diamonds: i64,
    /// Cards granted when opened.
    pub card_count: u32,
}

impl From<&StorePack> for PackDto {
    fn from(pack: &StorePack) -> Self {
        Self {
            id: pack.id.clone(),
            name: pack.name.clone(),
            league: pack.league.clone(),
            price_coins: pack.price_coins,
            price_diamonds: pack.price_diamonds,
            card_count: pack.card_count,
        }
    }
}

/// Pack catalog response.
#[derive(Debug, Serialize)]
pub struct ListPacksResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// Purchasable packs.
    pub packs: Vec<PackDto>,
    /// The caller's wallet, for affordability display.
    pub wallet: WalletDto,
}

/// List purchasable packs together with the caller's wallet.
pub async fn list_packs(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<ListPacksResponse>, ApiError> {
    let user = state
        .store
        .get_user(&auth.user_id)?
        .ok_or_else(|| ApiError::NotFound(format!("user not found: {}", auth.user_id)))?;

    let wallet = state
        .store
        .get_wallet(&user.id)?
        .unwrap_or_else(|| Wallet::new(user.id));
    let packs = state.store.list_packs()?.iter().map(PackDto::from).collect();

    Ok(Json(ListPacksResponse {
        success: true,
        packs,
        wallet: wallet.into(),
    }))
}

/// Pack purchase request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePackRequest {
    /// Slug of the pack to buy.
    pub pack_id: Option<String>,
}

/// Pack purchase response.
#[derive(Debug, Serialize)]
pub struct PurchasePackResponse {
    /// The mutation envelope.
    #[serde(flatten)]
    pub mutation: MutationResponse,
    /// The purchased pack.
    pub pack: PackDto,
}

/// Buy a pack, debiting the wallet.
pub async fn purchase_pack(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<PurchasePackRequest>,
) -> Result<Json<PurchasePackResponse>, ApiError> {
    let pack_id = body
        .pack_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing packId".into()))?;

    let pack = state
        .store
        .get_pack(pack_id)?
        .ok_or_else(|| ApiError::NotFound(format!("pack not found: {pack_id}")))?;

    let event = ProgressionEvent::pack_purchase(
        auth.user_id,
        &pack.id,
        pack.price_coins,
        pack.price_diamonds,
    );
    let (progression, wallet) = state.store.apply_event(&event)?;

    tracing::info!(
        user_id = %auth.user_id,
        event_id = %event.id,
        pack_id = %pack.id,
        price_coins = %pack.price_coins,
        price_diamonds = %pack.price_diamonds,
        "Pack purchased"
    );

    Ok(Json(PurchasePackResponse {
        mutation: MutationResponse::applied(event.id.to_string(), progression, wallet),
        pack: PackDto::from(&pack),
    }))
}

/// Admin pack upsert request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPackRequest {
    /// Pack slug.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// League, for league packs.
    pub league: Option<String>,
    /// Coin price (default: 0).
    pub price_coins: Option<i64>,
    /// Diamond price (default: 0).
    pub price_diamonds: Option<i64>,
    /// Cards granted when opened.
    pub card_count: Option<u32>,
}

/// Admin pack upsert response.
#[derive(Debug, Serialize)]
pub struct UpsertPackResponse {
    /// Whether the upsert succeeded.
    pub success: bool,
    /// The stored pack.
    pub pack: PackDto,
}

/// Create or update a store pack (admin only).
pub async fn admin_upsert_pack(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(body): Json<UpsertPackRequest>,
) -> Result<Json<UpsertPackResponse>, ApiError> {
    let admin = require_admin(&state, &auth)?;

    let id = body
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing id".into()))?;
    let name = body
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing name".into()))?;
    let price_coins = body.price_coins.unwrap_or(0);
    let price_diamonds = body.price_diamonds.unwrap_or(0);
    if price_coins < 0 || price_diamonds < 0 {
        return Err(ApiError::BadRequest("prices must be non-negative".into()));
    }
    let card_count = body
        .card_count
        .filter(|count| *count >= 1)
        .ok_or_else(|| ApiError::BadRequest("cardCount must be at least 1".into()))?;

    let pack = StorePack {
        id: id.to_string(),
        name: name.to_string(),
        league: body.league.clone(),
        price_coins,
        price_diamonds,
        card_count,
        updated_at: chrono::Utc::now(),
    };
    state.store.put_pack(&pack)?;

    tracing::info!(
        admin_id = %admin.id,
        pack_id = %pack.id,
        "Store pack upserted"
    );

    Ok(Json(UpsertPackResponse {
        success: true,
        pack: PackDto::from(&pack),
    }))
}
