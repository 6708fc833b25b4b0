//! Key encoding utilities for `RocksDB`.
//!
//! This module provides functions for encoding and decoding keys used in
//! column families. Composite keys concatenate fixed-width components so
//! prefix iteration stays cheap.

use codex_core::{CardRef, CardType, DeckId, EventId, UserId};

/// Single-byte tag for a card type inside composite keys.
const fn card_type_tag(card_type: CardType) -> u8 {
    match card_type {
        CardType::Creature => 0,
        CardType::Attack => 1,
        CardType::Ability => 2,
        CardType::Location => 3,
        CardType::Mugic => 4,
        CardType::Battlegear => 5,
    }
}

/// Create a user key from a user ID.
#[must_use]
pub fn user_key(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create an event key from an event ID.
#[must_use]
pub fn event_key(event_id: &EventId) -> Vec<u8> {
    event_id.to_bytes().to_vec()
}

/// Create a user-event index key.
///
/// Format: `user_id (16 bytes) || event_id (16 bytes)`
///
/// Since ULIDs are time-ordered, events for a user will be sorted by time.
#[must_use]
pub fn user_event_key(user_id: &UserId, event_id: &EventId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(&event_id.to_bytes());
    key
}

/// Create a prefix for iterating all events for a user.
#[must_use]
pub fn user_events_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the event ID from a user-event index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_event_id_from_user_key(key: &[u8]) -> EventId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    EventId::from_bytes(bytes).expect("valid ULID bytes")
}

/// Create a card holding key.
///
/// Format: `user_id (16 bytes) || card_type (1 byte) || card_id (16 bytes)`
#[must_use]
pub fn user_card_key(user_id: &UserId, card: &CardRef) -> Vec<u8> {
    let mut key = Vec::with_capacity(33);
    key.extend_from_slice(user_id.as_bytes());
    key.push(card_type_tag(card.card_type));
    key.extend_from_slice(card.card_id.as_bytes());
    key
}

/// Create a prefix for iterating all card holdings of a user.
#[must_use]
pub fn user_cards_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Create a deck key from a deck ID.
#[must_use]
pub fn deck_key(deck_id: &DeckId) -> Vec<u8> {
    deck_id.as_bytes().to_vec()
}

/// Create a user-deck index key.
///
/// Format: `user_id (16 bytes) || deck_id (16 bytes)`
#[must_use]
pub fn user_deck_key(user_id: &UserId, deck_id: &DeckId) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(user_id.as_bytes());
    key.extend_from_slice(deck_id.as_bytes());
    key
}

/// Create a prefix for iterating all decks of a user.
#[must_use]
pub fn user_decks_prefix(user_id: &UserId) -> Vec<u8> {
    user_id.as_bytes().to_vec()
}

/// Extract the deck ID from a user-deck index key.
///
/// # Panics
///
/// Panics if the key is not at least 32 bytes.
#[must_use]
pub fn extract_deck_id_from_user_key(key: &[u8]) -> DeckId {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&key[16..32]);
    DeckId::from_uuid(uuid::Uuid::from_bytes(bytes))
}

/// Create a deck card assignment key.
///
/// Format: `deck_id (16 bytes) || card_type (1 byte) || card_id (16 bytes)`
#[must_use]
pub fn deck_card_key(deck_id: &DeckId, card: &CardRef) -> Vec<u8> {
    let mut key = Vec::with_capacity(33);
    key.extend_from_slice(deck_id.as_bytes());
    key.push(card_type_tag(card.card_type));
    key.extend_from_slice(card.card_id.as_bytes());
    key
}

/// Create a prefix for iterating all card assignments of a deck.
#[must_use]
pub fn deck_cards_prefix(deck_id: &DeckId) -> Vec<u8> {
    deck_id.as_bytes().to_vec()
}

/// Create a store pack key from a pack slug.
#[must_use]
pub fn pack_key(pack_id: &str) -> Vec<u8> {
    pack_id.as_bytes().to_vec()
}
