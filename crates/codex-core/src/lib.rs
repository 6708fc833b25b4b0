//! Core types and utilities for the Codex collection service.
//!
//! This crate provides the foundational types used throughout the platform:
//!
//! - **Identifiers**: `UserId`, `EventId`, `CardId`, `DeckId`
//! - **Users**: `User`, `Role`
//! - **Wallet**: the pair of spendable balances (coins, diamonds)
//! - **Progression**: `ProgressionState`, the fixed XP curve, reward constants
//! - **Events**: `ProgressionEvent`, the append-only reward/debit ledger
//! - **Cards**: `CardType`, `Rarity`, `CardRef`, `UserCard`
//! - **Decks**: `Deck`, `DeckCard`
//! - **Packs**: `StorePack`
//!
//! # Ledger invariant
//!
//! Every wallet balance or card quantity mutation corresponds to exactly one
//! `ProgressionEvent` row. The event log is the source of truth for
//! "has this action already been rewarded" checks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cards;
pub mod deck;
pub mod error;
pub mod events;
pub mod ids;
pub mod packs;
pub mod progression;
pub mod user;
pub mod wallet;

pub use cards::{CardRef, CardType, Rarity, UserCard};
pub use deck::{Deck, DeckCard};
pub use error::{CoreError, Result};
pub use events::{
    deck_reference, pack_claim_reference, pack_purchase_reference, CardChange, EventSource,
    ProgressionEvent,
};
pub use ids::{CardId, DeckId, EventId, IdError, UserId};
pub use packs::StorePack;
pub use progression::{
    level_for_xp, xp_threshold, ProgressionState, BATTLE_VICTORY_COINS, BATTLE_VICTORY_XP,
    CARD_AWARD_XP, PACK_CLAIM_COINS, PACK_CLAIM_DIAMONDS, PACK_CLAIM_XP,
};
pub use user::{Role, User};
pub use wallet::Wallet;
