//! Request and response types mirroring the codex-service API.

use serde::{Deserialize, Serialize};

/// Progression aggregate in API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Progression {
    /// Cumulative experience total.
    pub xp_total: i64,
    /// Current level.
    pub level: u32,
    /// Cumulative XP at which the current level begins.
    pub level_floor_xp: i64,
    /// Cumulative XP at which the next level begins.
    pub next_level_xp: i64,
}

/// Wallet balances in API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct WalletBalances {
    /// Coin balance.
    pub coins: i64,
    /// Diamond balance.
    pub diamonds: i64,
}

/// Response to a progression mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    /// Whether the mutation was applied.
    pub success: bool,
    /// Id of the ledger row the mutation appended.
    pub event_id: String,
    /// Updated progression aggregate.
    pub progression: Progression,
    /// Updated wallet.
    pub wallet: WalletBalances,
}

/// Response to the progression overview read.
#[derive(Debug, Clone, Deserialize)]
pub struct OverviewResponse {
    /// Whether the read succeeded.
    pub success: bool,
    /// Progression aggregate.
    pub progression: Progression,
    /// Wallet balances.
    pub wallet: WalletBalances,
    /// Total copies held across the collection.
    pub collection_size: i64,
}

/// A user row in sync responses.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSummary {
    /// User id.
    pub id: String,
    /// Display handle.
    pub handle: String,
    /// Access role.
    pub role: String,
    /// First-seen timestamp (RFC 3339).
    pub created_at: String,
    /// Last-seen timestamp (RFC 3339).
    pub last_seen_at: String,
}

/// Response to a session sync.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncResponse {
    /// Whether the sync succeeded.
    pub success: bool,
    /// The stored user.
    pub user: UserSummary,
    /// Whether this sync created the user.
    pub created: bool,
}

/// Response to the claimed-leagues read.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimedLeaguesResponse {
    /// Always true; the endpoint fails open.
    pub success: bool,
    /// Leagues with a claim within the scan window, newest first.
    pub leagues: Vec<String>,
}

/// Card award request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardCardRequest {
    /// Catalog the card belongs to.
    pub card_type: String,
    /// Catalog card id.
    pub card_id: String,
    /// Card rarity.
    pub rarity: String,
    /// Copies to award (server default: 1).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    /// Reference id recorded on the ledger row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

/// Error envelope returned by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Always false on errors.
    pub success: bool,
    /// Error message.
    pub error: String,
}
