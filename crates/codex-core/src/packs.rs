//! Store pack catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A purchasable or claimable card bundle in the store catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorePack {
    /// Stable slug identifying the pack (e.g. `"ember-starter"`).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Codex Trials league the pack belongs to, when it is a league pack.
    pub league: Option<String>,

    /// Coin price. Zero when the pack is priced in diamonds only.
    pub price_coins: i64,

    /// Diamond price. Zero when the pack is priced in coins only.
    pub price_diamonds: i64,

    /// Number of cards granted when the pack is opened.
    pub card_count: u32,

    /// When the catalog row was last changed.
    pub updated_at: DateTime<Utc>,
}

impl StorePack {
    /// Create a coin-priced pack.
    #[must_use]
    pub fn priced_in_coins(id: String, name: String, price_coins: i64, card_count: u32) -> Self {
        Self {
            id,
            name,
            league: None,
            price_coins,
            price_diamonds: 0,
            card_count,
            updated_at: Utc::now(),
        }
    }
}
