//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait. All compound operations stage their writes in a single
//! `WriteBatch` so one request's mutations land atomically.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, IteratorMode, MultiThreaded,
    Options, WriteBatch,
};

use codex_core::{
    CardRef, Deck, DeckCard, DeckId, EventId, ProgressionEvent, ProgressionState, StorePack, User,
    UserCard, UserId, Wallet,
};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<MultiThreaded>>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Fetch a single value from a column family.
    fn get_value<T: serde::de::DeserializeOwned>(&self, cf_name: &str, key: &[u8]) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    /// Collect every value of a column family whose key starts with `prefix`.
    fn scan_prefix<T: serde::de::DeserializeOwned>(
        &self,
        cf_name: &str,
        prefix: &[u8],
    ) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let iter = self
            .db
            .iterator_cf(&cf, IteratorMode::From(prefix, rocksdb::Direction::Forward));

        let mut values = Vec::new();
        for item in iter {
            let (key, data) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            values.push(Self::deserialize(&data)?);
        }

        Ok(values)
    }

    /// Stage the ledger append and aggregate upserts for an event.
    ///
    /// Performs the constraint checks (user exists, balances stay
    /// non-negative, card quantity stays non-negative) and returns the
    /// updated aggregates together with the staged batch. Nothing is
    /// written until the caller commits the batch.
    fn stage_event(
        &self,
        event: &ProgressionEvent,
        batch: &mut WriteBatch,
    ) -> Result<(ProgressionState, Wallet)> {
        // The caller must have resolved the user already.
        if self.get_user(&event.user_id)?.is_none() {
            return Err(StoreError::NotFound {
                entity: "user",
                id: event.user_id.to_string(),
            });
        }

        // Wallet, created lazily on first mutation.
        let mut wallet = self
            .get_wallet(&event.user_id)?
            .unwrap_or_else(|| Wallet::new(event.user_id));

        if wallet.coins + event.coin_delta < 0 {
            return Err(StoreError::InsufficientFunds {
                currency: "coins",
                balance: wallet.coins,
                required: -event.coin_delta,
            });
        }
        if wallet.diamonds + event.diamond_delta < 0 {
            return Err(StoreError::InsufficientFunds {
                currency: "diamonds",
                balance: wallet.diamonds,
                required: -event.diamond_delta,
            });
        }
        wallet.coins += event.coin_delta;
        wallet.diamonds += event.diamond_delta;
        wallet.updated_at = chrono::Utc::now();

        // Progression, recomputed from the new XP total.
        let mut progression = self
            .get_progression(&event.user_id)?
            .unwrap_or_else(|| ProgressionState::new(event.user_id));

        if progression.xp_total + event.xp_delta < 0 {
            return Err(StoreError::InvalidEvent(
                "xp total would become negative".into(),
            ));
        }
        progression.apply_xp(event.xp_delta);

        let cf_events = self.cf(cf::EVENTS)?;
        let cf_events_by_user = self.cf(cf::EVENTS_BY_USER)?;
        let cf_wallets = self.cf(cf::WALLETS)?;
        let cf_progression = self.cf(cf::PROGRESSION)?;

        // Card holding, when the event carries a card change.
        if let Some(change) = &event.card {
            let mut holding = self
                .get_user_card(&event.user_id, &change.card)?
                .unwrap_or_else(|| UserCard::new(event.user_id, change.card));

            let new_quantity = holding.quantity + change.quantity_delta;
            if new_quantity < 0 {
                return Err(StoreError::InsufficientQuantity {
                    held: holding.quantity,
                    requested: -change.quantity_delta,
                });
            }

            let cf_cards = self.cf(cf::USER_CARDS)?;
            let card_key = keys::user_card_key(&event.user_id, &change.card);
            if new_quantity == 0 {
                batch.delete_cf(&cf_cards, &card_key);
            } else {
                holding.quantity = new_quantity;
                holding.updated_at = chrono::Utc::now();
                batch.put_cf(&cf_cards, &card_key, Self::serialize(&holding)?);
            }
        }

        batch.put_cf(&cf_events, keys::event_key(&event.id), Self::serialize(event)?);
        batch.put_cf(
            &cf_events_by_user,
            keys::user_event_key(&event.user_id, &event.id),
            [], // Index entry (empty value)
        );
        batch.put_cf(
            &cf_wallets,
            keys::user_key(&event.user_id),
            Self::serialize(&wallet)?,
        );
        batch.put_cf(
            &cf_progression,
            keys::user_key(&event.user_id),
            Self::serialize(&progression)?,
        );

        Ok((progression, wallet))
    }
}

impl Store for RocksStore {
    // =========================================================================
    // User Operations
    // =========================================================================

    fn put_user(&self, user: &User) -> Result<()> {
        let cf = self.cf(cf::USERS)?;
        self.db
            .put_cf(&cf, keys::user_key(&user.id), Self::serialize(user)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_user(&self, user_id: &UserId) -> Result<Option<User>> {
        self.get_value(cf::USERS, &keys::user_key(user_id))
    }

    fn list_users(&self) -> Result<Vec<User>> {
        self.scan_prefix(cf::USERS, &[])
    }

    // =========================================================================
    // Wallet & Progression Operations
    // =========================================================================

    fn get_wallet(&self, user_id: &UserId) -> Result<Option<Wallet>> {
        self.get_value(cf::WALLETS, &keys::user_key(user_id))
    }

    fn get_progression(&self, user_id: &UserId) -> Result<Option<ProgressionState>> {
        self.get_value(cf::PROGRESSION, &keys::user_key(user_id))
    }

    // =========================================================================
    // Event Operations
    // =========================================================================

    fn get_event(&self, event_id: &EventId) -> Result<Option<ProgressionEvent>> {
        self.get_value(cf::EVENTS, &keys::event_key(event_id))
    }

    fn list_events_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ProgressionEvent>> {
        let cf_by_user = self.cf(cf::EVENTS_BY_USER)?;
        let prefix = keys::user_events_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        // Collect all matching keys first (ULIDs are naturally time-ordered).
        let mut all_keys: Vec<Vec<u8>> = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            all_keys.push(key.to_vec());
        }

        // Reverse to get newest first.
        all_keys.reverse();

        let mut events = Vec::new();
        for key in all_keys.into_iter().skip(offset) {
            if events.len() >= limit {
                break;
            }
            let event_id = keys::extract_event_id_from_user_key(&key);
            if let Some(event) = self.get_event(&event_id)? {
                events.push(event);
            }
        }

        Ok(events)
    }

    // =========================================================================
    // Card Holding Operations
    // =========================================================================

    fn get_user_card(&self, user_id: &UserId, card: &CardRef) -> Result<Option<UserCard>> {
        self.get_value(cf::USER_CARDS, &keys::user_card_key(user_id, card))
    }

    fn list_user_cards(&self, user_id: &UserId) -> Result<Vec<UserCard>> {
        self.scan_prefix(cf::USER_CARDS, &keys::user_cards_prefix(user_id))
    }

    // =========================================================================
    // Deck Operations
    // =========================================================================

    fn put_deck(&self, deck: &Deck) -> Result<()> {
        let cf_decks = self.cf(cf::DECKS)?;
        let cf_by_user = self.cf(cf::DECKS_BY_USER)?;

        let mut batch = WriteBatch::default();
        batch.put_cf(&cf_decks, keys::deck_key(&deck.id), Self::serialize(deck)?);
        batch.put_cf(&cf_by_user, keys::user_deck_key(&deck.user_id, &deck.id), []);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_deck(&self, deck_id: &DeckId) -> Result<Option<Deck>> {
        self.get_value(cf::DECKS, &keys::deck_key(deck_id))
    }

    fn list_decks_by_user(&self, user_id: &UserId) -> Result<Vec<Deck>> {
        let cf_by_user = self.cf(cf::DECKS_BY_USER)?;
        let prefix = keys::user_decks_prefix(user_id);

        let iter = self.db.iterator_cf(
            &cf_by_user,
            IteratorMode::From(&prefix, rocksdb::Direction::Forward),
        );

        let mut decks = Vec::new();
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let deck_id = keys::extract_deck_id_from_user_key(&key);
            if let Some(deck) = self.get_deck(&deck_id)? {
                decks.push(deck);
            }
        }

        Ok(decks)
    }

    fn get_deck_card(&self, deck_id: &DeckId, card: &CardRef) -> Result<Option<DeckCard>> {
        self.get_value(cf::DECK_CARDS, &keys::deck_card_key(deck_id, card))
    }

    fn list_deck_cards(&self, deck_id: &DeckId) -> Result<Vec<DeckCard>> {
        self.scan_prefix(cf::DECK_CARDS, &keys::deck_cards_prefix(deck_id))
    }

    // =========================================================================
    // Store Pack Operations
    // =========================================================================

    fn put_pack(&self, pack: &StorePack) -> Result<()> {
        let cf = self.cf(cf::STORE_PACKS)?;
        self.db
            .put_cf(&cf, keys::pack_key(&pack.id), Self::serialize(pack)?)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    fn get_pack(&self, pack_id: &str) -> Result<Option<StorePack>> {
        self.get_value(cf::STORE_PACKS, &keys::pack_key(pack_id))
    }

    fn list_packs(&self) -> Result<Vec<StorePack>> {
        self.scan_prefix(cf::STORE_PACKS, &[])
    }

    // =========================================================================
    // Compound Operations
    // =========================================================================

    fn apply_event(&self, event: &ProgressionEvent) -> Result<(ProgressionState, Wallet)> {
        let mut batch = WriteBatch::default();
        let (progression, wallet) = self.stage_event(event, &mut batch)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((progression, wallet))
    }

    fn apply_deck_move(
        &self,
        event: &ProgressionEvent,
        deck_id: &DeckId,
    ) -> Result<(ProgressionState, Wallet)> {
        let mut deck = self.get_deck(deck_id)?.ok_or_else(|| StoreError::NotFound {
            entity: "deck",
            id: deck_id.to_string(),
        })?;

        let change = event.card.as_ref().ok_or_else(|| {
            StoreError::InvalidEvent("deck move event carries no card change".into())
        })?;

        // The deck side moves opposite to the collection side.
        let deck_delta = -change.quantity_delta;

        let mut assignment = self
            .get_deck_card(deck_id, &change.card)?
            .unwrap_or_else(|| DeckCard::new(*deck_id, change.card));

        let new_quantity = assignment.quantity + deck_delta;
        if new_quantity < 0 {
            return Err(StoreError::InsufficientQuantity {
                held: assignment.quantity,
                requested: -deck_delta,
            });
        }

        let mut batch = WriteBatch::default();
        let (progression, wallet) = self.stage_event(event, &mut batch)?;

        let cf_deck_cards = self.cf(cf::DECK_CARDS)?;
        let cf_decks = self.cf(cf::DECKS)?;
        let assignment_key = keys::deck_card_key(deck_id, &change.card);
        if new_quantity == 0 {
            batch.delete_cf(&cf_deck_cards, &assignment_key);
        } else {
            assignment.quantity = new_quantity;
            batch.put_cf(&cf_deck_cards, &assignment_key, Self::serialize(&assignment)?);
        }

        deck.updated_at = chrono::Utc::now();
        batch.put_cf(&cf_decks, keys::deck_key(deck_id), Self::serialize(&deck)?);

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok((progression, wallet))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_core::{
        CardId, CardType, EventSource, Rarity, BATTLE_VICTORY_COINS, BATTLE_VICTORY_XP,
    };
    use tempfile::TempDir;

    fn create_test_store() -> (RocksStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = RocksStore::open(dir.path()).unwrap();
        (store, dir)
    }

    fn seed_user(store: &RocksStore) -> UserId {
        let user = User::new(UserId::generate(), "kaz".into());
        store.put_user(&user).unwrap();
        user.id
    }

    fn creature() -> CardRef {
        CardRef::new(CardType::Creature, CardId::generate())
    }

    #[test]
    fn user_crud() {
        let (store, _dir) = create_test_store();
        let mut user = User::new(UserId::generate(), "kaz".into());

        store.put_user(&user).unwrap();
        let retrieved = store.get_user(&user.id).unwrap().unwrap();
        assert_eq!(retrieved.handle, "kaz");

        user.handle = "tom".into();
        store.put_user(&user).unwrap();
        let retrieved = store.get_user(&user.id).unwrap().unwrap();
        assert_eq!(retrieved.handle, "tom");

        assert_eq!(store.list_users().unwrap().len(), 1);
    }

    #[test]
    fn battle_victory_creates_wallet_and_progression_lazily() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);

        assert!(store.get_wallet(&user_id).unwrap().is_none());

        let event = ProgressionEvent::battle_victory(user_id);
        let (progression, wallet) = store.apply_event(&event).unwrap();

        assert_eq!(wallet.coins, BATTLE_VICTORY_COINS);
        assert_eq!(wallet.diamonds, 0);
        assert_eq!(progression.xp_total, BATTLE_VICTORY_XP);
        assert_eq!(progression.level, 1);

        // Exactly one ledger row.
        let events = store.list_events_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, EventSource::BattleVictory);
    }

    #[test]
    fn apply_event_unknown_user_fails() {
        let (store, _dir) = create_test_store();
        let event = ProgressionEvent::battle_victory(UserId::generate());
        let result = store.apply_event(&event);
        assert!(matches!(result, Err(StoreError::NotFound { entity: "user", .. })));
    }

    #[test]
    fn event_listing_is_newest_first_with_pagination() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);

        store
            .apply_event(&ProgressionEvent::battle_victory(user_id))
            .unwrap();
        // ULIDs are generated at creation time; ensure distinct timestamps.
        std::thread::sleep(std::time::Duration::from_millis(2));
        store
            .apply_event(&ProgressionEvent::card_awarded(user_id, creature(), 1, None))
            .unwrap();

        let events = store.list_events_by_user(&user_id, 10, 0).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].source, EventSource::CardAwarded); // Newest first
        assert_eq!(events[1].source, EventSource::BattleVictory);

        let page1 = store.list_events_by_user(&user_id, 1, 0).unwrap();
        let page2 = store.list_events_by_user(&user_id, 1, 1).unwrap();
        assert_eq!(page1[0].source, EventSource::CardAwarded);
        assert_eq!(page2[0].source, EventSource::BattleVictory);
    }

    #[test]
    fn purchase_with_insufficient_coins_fails_and_mutates_nothing() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);

        let event = ProgressionEvent::pack_purchase(user_id, "ember-starter", 300, 0);
        let result = store.apply_event(&event);
        assert!(matches!(
            result,
            Err(StoreError::InsufficientFunds {
                currency: "coins",
                balance: 0,
                required: 300
            })
        ));

        assert!(store.get_wallet(&user_id).unwrap().is_none());
        assert!(store.list_events_by_user(&user_id, 10, 0).unwrap().is_empty());
    }

    #[test]
    fn discard_more_than_held_fails_and_mutates_nothing() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);
        let card = creature();

        store
            .apply_event(&ProgressionEvent::card_awarded(user_id, card, 2, None))
            .unwrap();

        let refund = Rarity::Common.sell_value_coins() * 3;
        let result = store.apply_event(&ProgressionEvent::card_discarded(user_id, card, 3, refund));
        assert!(matches!(
            result,
            Err(StoreError::InsufficientQuantity {
                held: 2,
                requested: 3
            })
        ));

        let holding = store.get_user_card(&user_id, &card).unwrap().unwrap();
        assert_eq!(holding.quantity, 2);
        assert_eq!(store.list_events_by_user(&user_id, 10, 0).unwrap().len(), 1);
    }

    #[test]
    fn discard_to_zero_removes_holding() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);
        let card = creature();

        store
            .apply_event(&ProgressionEvent::card_awarded(user_id, card, 2, None))
            .unwrap();

        let refund = Rarity::Common.sell_value_coins() * 2;
        let (_, wallet) = store
            .apply_event(&ProgressionEvent::card_discarded(user_id, card, 2, refund))
            .unwrap();

        assert!(store.get_user_card(&user_id, &card).unwrap().is_none());
        assert_eq!(wallet.coins, refund);
        assert!(store.list_user_cards(&user_id).unwrap().is_empty());
    }

    #[test]
    fn deck_move_round_trip() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);
        let card = creature();

        store
            .apply_event(&ProgressionEvent::card_awarded(user_id, card, 3, None))
            .unwrap();

        let deck = Deck::new(user_id, "Overworld rush".into());
        store.put_deck(&deck).unwrap();

        // Move two copies in.
        let assembly = ProgressionEvent::deck_assembly(user_id, &deck.id, card, 2);
        store.apply_deck_move(&assembly, &deck.id).unwrap();

        let holding = store.get_user_card(&user_id, &card).unwrap().unwrap();
        assert_eq!(holding.quantity, 1);
        let assignment = store.get_deck_card(&deck.id, &card).unwrap().unwrap();
        assert_eq!(assignment.quantity, 2);

        // Move them back out.
        let removal = ProgressionEvent::deck_removal(user_id, &deck.id, card, 2);
        store.apply_deck_move(&removal, &deck.id).unwrap();

        let holding = store.get_user_card(&user_id, &card).unwrap().unwrap();
        assert_eq!(holding.quantity, 3);
        assert!(store.get_deck_card(&deck.id, &card).unwrap().is_none());
        assert!(store.list_deck_cards(&deck.id).unwrap().is_empty());
    }

    #[test]
    fn deck_removal_exceeding_assignment_fails() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);
        let card = creature();

        store
            .apply_event(&ProgressionEvent::card_awarded(user_id, card, 1, None))
            .unwrap();
        let deck = Deck::new(user_id, "Empty".into());
        store.put_deck(&deck).unwrap();

        let removal = ProgressionEvent::deck_removal(user_id, &deck.id, card, 1);
        let result = store.apply_deck_move(&removal, &deck.id);
        assert!(matches!(result, Err(StoreError::InsufficientQuantity { .. })));
    }

    #[test]
    fn deck_listing_by_user() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);
        let other_id = seed_user(&store);

        store.put_deck(&Deck::new(user_id, "First".into())).unwrap();
        store.put_deck(&Deck::new(user_id, "Second".into())).unwrap();
        store.put_deck(&Deck::new(other_id, "Other".into())).unwrap();

        assert_eq!(store.list_decks_by_user(&user_id).unwrap().len(), 2);
        assert_eq!(store.list_decks_by_user(&other_id).unwrap().len(), 1);
    }

    #[test]
    fn pack_catalog_crud() {
        let (store, _dir) = create_test_store();

        let pack =
            StorePack::priced_in_coins("ember-starter".into(), "Ember Starter".into(), 300, 5);
        store.put_pack(&pack).unwrap();

        let retrieved = store.get_pack("ember-starter").unwrap().unwrap();
        assert_eq!(retrieved.price_coins, 300);
        assert!(store.get_pack("missing").unwrap().is_none());
        assert_eq!(store.list_packs().unwrap().len(), 1);
    }

    #[test]
    fn claim_events_are_visible_in_listing() {
        let (store, _dir) = create_test_store();
        let user_id = seed_user(&store);

        store
            .apply_event(&ProgressionEvent::pack_claim(user_id, "fire"))
            .unwrap();

        let events = store.list_events_by_user(&user_id, 200, 0).unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].source.is_claim());
        assert_eq!(events[0].reference_id.as_deref(), Some("codex-pack:fire"));
    }
}
