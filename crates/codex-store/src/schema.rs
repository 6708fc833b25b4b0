//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage, one
//! per logical table of the game data.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// User records, keyed by `user_id`.
    pub const USERS: &str = "users";

    /// Wallets, keyed by `user_id`.
    pub const WALLETS: &str = "wallets";

    /// Progression aggregates, keyed by `user_id`.
    pub const PROGRESSION: &str = "progression";

    /// Progression events, keyed by `event_id` (ULID).
    pub const EVENTS: &str = "events";

    /// Index: events by user, keyed by `user_id || event_id`.
    /// Value is empty (index only).
    pub const EVENTS_BY_USER: &str = "events_by_user";

    /// Card holdings, keyed by `user_id || card_type || card_id`.
    pub const USER_CARDS: &str = "user_cards";

    /// Decks, keyed by `deck_id`.
    pub const DECKS: &str = "decks";

    /// Index: decks by user, keyed by `user_id || deck_id`.
    /// Value is empty (index only).
    pub const DECKS_BY_USER: &str = "decks_by_user";

    /// Deck card assignments, keyed by `deck_id || card_type || card_id`.
    pub const DECK_CARDS: &str = "deck_cards";

    /// Store pack catalog, keyed by pack slug.
    pub const STORE_PACKS: &str = "store_packs";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![
        cf::USERS,
        cf::WALLETS,
        cf::PROGRESSION,
        cf::EVENTS,
        cf::EVENTS_BY_USER,
        cf::USER_CARDS,
        cf::DECKS,
        cf::DECKS_BY_USER,
        cf::DECK_CARDS,
        cf::STORE_PACKS,
    ]
}
