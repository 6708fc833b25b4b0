//! `RocksDB` storage layer for the Codex collection service.
//!
//! This crate provides persistent storage for users, wallets, progression
//! aggregates, the progression event ledger, card holdings, decks, and the
//! store pack catalog, using `RocksDB` with column families for efficient
//! indexing.
//!
//! # Architecture
//!
//! The storage uses the following column families:
//!
//! - `users`: user records, keyed by `user_id`
//! - `wallets`: wallets, keyed by `user_id`
//! - `progression`: progression aggregates, keyed by `user_id`
//! - `events`: progression events, keyed by `event_id` (ULID)
//! - `events_by_user`: index for listing events by user
//! - `user_cards`: card holdings, keyed by `user || card_type || card_id`
//! - `decks` / `decks_by_user` / `deck_cards`: deck state
//! - `store_packs`: pack catalog, keyed by slug
//!
//! # Example
//!
//! ```no_run
//! use codex_store::{RocksStore, Store};
//! use codex_core::{ProgressionEvent, User, UserId};
//!
//! let store = RocksStore::open("/tmp/codex-db").unwrap();
//!
//! let user = User::new(UserId::generate(), "kaz".into());
//! store.put_user(&user).unwrap();
//!
//! let event = ProgressionEvent::battle_victory(user.id);
//! let (progression, wallet) = store.apply_event(&event).unwrap();
//! assert_eq!(wallet.coins, 25);
//! assert_eq!(progression.xp_total, 50);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod keys;
pub mod rocks;
pub mod schema;

pub use error::{Result, StoreError};
pub use rocks::RocksStore;

use codex_core::{
    CardRef, Deck, DeckCard, DeckId, EventId, ProgressionEvent, ProgressionState, StorePack, User,
    UserCard, UserId, Wallet,
};

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (e.g. `RocksDB`, in-memory for testing).
pub trait Store: Send + Sync {
    // =========================================================================
    // User Operations
    // =========================================================================

    /// Insert or update a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_user(&self, user: &User) -> Result<()>;

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user(&self, user_id: &UserId) -> Result<Option<User>>;

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_users(&self) -> Result<Vec<User>>;

    // =========================================================================
    // Wallet & Progression Operations
    // =========================================================================

    /// Get a wallet by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>>;

    /// Get a progression aggregate by user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_progression(&self, user_id: &UserId) -> Result<Option<ProgressionState>>;

    // =========================================================================
    // Event Operations
    // =========================================================================

    /// Get an event by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_event(&self, event_id: &EventId) -> Result<Option<ProgressionEvent>>;

    /// List events for a user, ordered by time (newest first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_events_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProgressionEvent>>;

    // =========================================================================
    // Card Holding Operations
    // =========================================================================

    /// Get one card holding.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_user_card(&self, user_id: &UserId, card: &CardRef) -> Result<Option<UserCard>>;

    /// List all card holdings of a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_user_cards(&self, user_id: &UserId) -> Result<Vec<UserCard>>;

    // =========================================================================
    // Deck Operations
    // =========================================================================

    /// Insert or update a deck.
    ///
    /// This also maintains the user index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_deck(&self, deck: &Deck) -> Result<()>;

    /// Get a deck by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_deck(&self, deck_id: &DeckId) -> Result<Option<Deck>>;

    /// List decks owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_decks_by_user(&self, user_id: &UserId) -> Result<Vec<Deck>>;

    /// Get one deck card assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_deck_card(&self, deck_id: &DeckId, card: &CardRef) -> Result<Option<DeckCard>>;

    /// List all card assignments of a deck.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_deck_cards(&self, deck_id: &DeckId) -> Result<Vec<DeckCard>>;

    // =========================================================================
    // Store Pack Operations
    // =========================================================================

    /// Insert or update a store pack.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn put_pack(&self, pack: &StorePack) -> Result<()>;

    /// Get a store pack by slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn get_pack(&self, pack_id: &str) -> Result<Option<StorePack>>;

    /// List the pack catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    fn list_packs(&self) -> Result<Vec<StorePack>>;

    // =========================================================================
    // Compound Operations
    // =========================================================================

    /// Apply a progression event: append it to the ledger and upsert the
    /// affected aggregates (progression, wallet, card holding) atomically.
    ///
    /// Wallets and progression aggregates are created lazily with zero
    /// values when the user has none yet. A card holding whose quantity
    /// reaches zero is removed.
    ///
    /// Returns the updated progression aggregate and wallet.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the user doesn't exist.
    /// - `StoreError::InsufficientFunds` if a debit exceeds a balance.
    /// - `StoreError::InsufficientQuantity` if a card removal exceeds the
    ///   held quantity.
    fn apply_event(&self, event: &ProgressionEvent) -> Result<(ProgressionState, Wallet)>;

    /// Apply a deck move event: like [`Store::apply_event`], but also
    /// adjusts the deck card assignment by the opposite of the event's card
    /// quantity delta, in the same atomic batch.
    ///
    /// # Errors
    ///
    /// All of [`Store::apply_event`]'s errors, plus:
    ///
    /// - `StoreError::NotFound` if the deck doesn't exist.
    /// - `StoreError::InvalidEvent` if the event carries no card change.
    /// - `StoreError::InsufficientQuantity` if a removal exceeds the copies
    ///   assigned to the deck.
    fn apply_deck_move(
        &self,
        event: &ProgressionEvent,
        deck_id: &DeckId,
    ) -> Result<(ProgressionState, Wallet)>;
}
