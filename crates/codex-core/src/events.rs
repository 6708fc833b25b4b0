//! Progression event types.
//!
//! Every wallet or card-quantity mutation is recorded as exactly one
//! `ProgressionEvent`. Events are append-only and use ULIDs for
//! time-ordered ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::CardRef;
use crate::progression::{
    BATTLE_VICTORY_COINS, BATTLE_VICTORY_XP, CARD_AWARD_XP, PACK_CLAIM_COINS, PACK_CLAIM_DIAMONDS,
    PACK_CLAIM_XP,
};
use crate::{DeckId, EventId, UserId};

/// Build the reference id recorded by a league pack claim.
///
/// Claim detection matches on this prefix convention, case-insensitively.
#[must_use]
pub fn pack_claim_reference(league: &str) -> String {
    format!("codex-pack:{}", league.to_ascii_lowercase())
}

/// Build the reference id recorded by a store pack purchase.
#[must_use]
pub fn pack_purchase_reference(pack_id: &str) -> String {
    format!("store-pack:{pack_id}")
}

/// Build the reference id recorded by a deck card move.
#[must_use]
pub fn deck_reference(deck_id: &DeckId) -> String {
    format!("deck:{deck_id}")
}

/// One reward/debit transaction in the append-only ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionEvent {
    /// Unique event id (ULID for time-ordering).
    pub id: EventId,

    /// The user whose aggregates were affected.
    pub user_id: UserId,

    /// What produced this event.
    pub source: EventSource,

    /// XP applied. Positive = grant.
    pub xp_delta: i64,

    /// Coins applied. Positive = credit, negative = debit.
    pub coin_delta: i64,

    /// Diamonds applied. Positive = credit, negative = debit.
    pub diamond_delta: i64,

    /// Card quantity change, when the event touches a holding.
    pub card: Option<CardChange>,

    /// Caller-supplied reference id used for idempotency scans.
    pub reference_id: Option<String>,

    /// When the event was created.
    pub created_at: DateTime<Utc>,
}

/// A card quantity change carried by an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardChange {
    /// The card affected.
    pub card: CardRef,
    /// Copies added (positive) or removed (negative).
    pub quantity_delta: i64,
}

impl ProgressionEvent {
    /// Create a battle victory event with the fixed reward.
    #[must_use]
    pub fn battle_victory(user_id: UserId) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::BattleVictory,
            xp_delta: BATTLE_VICTORY_XP,
            coin_delta: BATTLE_VICTORY_COINS,
            diamond_delta: 0,
            card: None,
            reference_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a card award event.
    #[must_use]
    pub fn card_awarded(
        user_id: UserId,
        card: CardRef,
        quantity: i64,
        reference_id: Option<String>,
    ) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::CardAwarded,
            xp_delta: CARD_AWARD_XP * quantity,
            coin_delta: 0,
            diamond_delta: 0,
            card: Some(CardChange {
                card,
                quantity_delta: quantity.abs(),
            }),
            reference_id,
            created_at: Utc::now(),
        }
    }

    /// Create a card discard event with a sell-value coin refund.
    #[must_use]
    pub fn card_discarded(user_id: UserId, card: CardRef, quantity: i64, refund_coins: i64) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::CardDiscarded,
            xp_delta: 0,
            coin_delta: refund_coins,
            diamond_delta: 0,
            card: Some(CardChange {
                card,
                // Always negative for discards.
                quantity_delta: -quantity.abs(),
            }),
            reference_id: None,
            created_at: Utc::now(),
        }
    }

    /// Create a store pack purchase event debiting the wallet.
    #[must_use]
    pub fn pack_purchase(user_id: UserId, pack_id: &str, price_coins: i64, price_diamonds: i64) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::PackPurchase,
            xp_delta: 0,
            coin_delta: -price_coins.abs(),
            diamond_delta: -price_diamonds.abs(),
            card: None,
            reference_id: Some(pack_purchase_reference(pack_id)),
            created_at: Utc::now(),
        }
    }

    /// Create a league pack claim event with the fixed claim reward.
    #[must_use]
    pub fn pack_claim(user_id: UserId, league: &str) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::PackClaim,
            xp_delta: PACK_CLAIM_XP,
            coin_delta: PACK_CLAIM_COINS,
            diamond_delta: PACK_CLAIM_DIAMONDS,
            card: None,
            reference_id: Some(pack_claim_reference(league)),
            created_at: Utc::now(),
        }
    }

    /// Create a deck assembly event moving copies out of the collection.
    #[must_use]
    pub fn deck_assembly(user_id: UserId, deck_id: &DeckId, card: CardRef, quantity: i64) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::DeckAssembly,
            xp_delta: 0,
            coin_delta: 0,
            diamond_delta: 0,
            card: Some(CardChange {
                card,
                quantity_delta: -quantity.abs(),
            }),
            reference_id: Some(deck_reference(deck_id)),
            created_at: Utc::now(),
        }
    }

    /// Create a deck removal event moving copies back into the collection.
    #[must_use]
    pub fn deck_removal(user_id: UserId, deck_id: &DeckId, card: CardRef, quantity: i64) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::DeckRemoval,
            xp_delta: 0,
            coin_delta: 0,
            diamond_delta: 0,
            card: Some(CardChange {
                card,
                quantity_delta: quantity.abs(),
            }),
            reference_id: Some(deck_reference(deck_id)),
            created_at: Utc::now(),
        }
    }

    /// Create an admin grant event crediting the wallet directly.
    #[must_use]
    pub fn admin_grant(user_id: UserId, coins: i64, diamonds: i64, reference_id: Option<String>) -> Self {
        Self {
            id: EventId::generate(),
            user_id,
            source: EventSource::AdminGrant,
            xp_delta: 0,
            coin_delta: coins,
            diamond_delta: diamonds,
            card: None,
            reference_id,
            created_at: Utc::now(),
        }
    }
}

/// What produced a progression event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    /// Battle won.
    BattleVictory,

    /// Card granted.
    CardAwarded,

    /// Card discarded for its sell value.
    CardDiscarded,

    /// Store pack bought with wallet funds.
    PackPurchase,

    /// Codex Trials league pack claimed.
    PackClaim,

    /// Card moved from the collection into a deck.
    DeckAssembly,

    /// Card moved from a deck back into the collection.
    DeckRemoval,

    /// Manual grant by an administrator.
    AdminGrant,
}

impl EventSource {
    /// Get the source name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BattleVictory => "battle_victory",
            Self::CardAwarded => "card_awarded",
            Self::CardDiscarded => "card_discarded",
            Self::PackPurchase => "pack_purchase",
            Self::PackClaim => "pack_claim",
            Self::DeckAssembly => "deck_assembly",
            Self::DeckRemoval => "deck_removal",
            Self::AdminGrant => "admin_grant",
        }
    }

    /// Check if events from this source may claim a league pack reward.
    #[must_use]
    pub const fn is_claim(&self) -> bool {
        matches!(self, Self::PackClaim)
    }
}
