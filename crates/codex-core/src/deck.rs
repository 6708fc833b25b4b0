//! Deck types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::{CardRef, CardType};
use crate::{CardId, DeckId, UserId};

/// A user-assembled deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// The deck id.
    pub id: DeckId,

    /// The owning user.
    pub user_id: UserId,

    /// Display name.
    pub name: String,

    /// When the deck was created.
    pub created_at: DateTime<Utc>,

    /// When the deck was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Deck {
    /// Create a new empty deck.
    #[must_use]
    pub fn new(user_id: UserId, name: String) -> Self {
        let now = Utc::now();
        Self {
            id: DeckId::generate(),
            user_id,
            name,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Copies of one card assigned to a deck.
///
/// Keyed by (deck, card type, card id); the row is removed when the
/// quantity reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckCard {
    /// The deck the copies belong to.
    pub deck_id: DeckId,
    /// The catalog the card belongs to.
    pub card_type: CardType,
    /// The catalog card id.
    pub card_id: CardId,
    /// Copies in the deck.
    pub quantity: i64,
}

impl DeckCard {
    /// Create a deck assignment with zero copies.
    #[must_use]
    pub const fn new(deck_id: DeckId, card: CardRef) -> Self {
        Self {
            deck_id,
            card_type: card.card_type,
            card_id: card.card_id,
            quantity: 0,
        }
    }

    /// The card reference for this assignment.
    #[must_use]
    pub const fn card(&self) -> CardRef {
        CardRef::new(self.card_type, self.card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_deck_is_owned_and_timestamped() {
        let user_id = UserId::generate();
        let deck = Deck::new(user_id, "Overworld rush".into());
        assert_eq!(deck.user_id, user_id);
        assert_eq!(deck.created_at, deck.updated_at);
    }

    #[test]
    fn deck_card_reference() {
        let card = CardRef::new(CardType::Mugic, CardId::generate());
        let assignment = DeckCard::new(DeckId::generate(), card);
        assert_eq!(assignment.card(), card);
        assert_eq!(assignment.quantity, 0);
    }
}
