//! Card types, rarities, and per-user card holdings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::{CardId, UserId};

/// The catalog a card belongs to.
///
/// One variant per catalog table of the original game data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardType {
    /// Creature cards.
    Creature,
    /// Attack cards.
    Attack,
    /// Ability cards.
    Ability,
    /// Location cards.
    Location,
    /// Mugic cards.
    Mugic,
    /// Battlegear cards.
    Battlegear,
}

impl CardType {
    /// Get the card type name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Creature => "creature",
            Self::Attack => "attack",
            Self::Ability => "ability",
            Self::Location => "location",
            Self::Mugic => "mugic",
            Self::Battlegear => "battlegear",
        }
    }

    /// All card types, in catalog order.
    #[must_use]
    pub const fn all() -> [Self; 6] {
        [
            Self::Creature,
            Self::Attack,
            Self::Ability,
            Self::Location,
            Self::Mugic,
            Self::Battlegear,
        ]
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creature" => Ok(Self::Creature),
            "attack" => Ok(Self::Attack),
            "ability" => Ok(Self::Ability),
            "location" => Ok(Self::Location),
            "mugic" => Ok(Self::Mugic),
            "battlegear" => Ok(Self::Battlegear),
            other => Err(CoreError::UnknownCardType(other.to_string())),
        }
    }
}

/// Card rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    /// Common cards.
    Common,
    /// Uncommon cards.
    Uncommon,
    /// Rare cards.
    Rare,
    /// Super rare cards.
    SuperRare,
    /// Ultra rare cards.
    UltraRare,
}

impl Rarity {
    /// Coin value refunded per copy when a card of this rarity is discarded.
    #[must_use]
    pub const fn sell_value_coins(&self) -> i64 {
        match self {
            Self::Common => 5,
            Self::Uncommon => 15,
            Self::Rare => 40,
            Self::SuperRare => 100,
            Self::UltraRare => 250,
        }
    }

    /// Get the rarity name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::SuperRare => "super_rare",
            Self::UltraRare => "ultra_rare",
        }
    }
}

impl FromStr for Rarity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "common" => Ok(Self::Common),
            "uncommon" => Ok(Self::Uncommon),
            "rare" => Ok(Self::Rare),
            "super_rare" => Ok(Self::SuperRare),
            "ultra_rare" => Ok(Self::UltraRare),
            other => Err(CoreError::UnknownRarity(other.to_string())),
        }
    }
}

/// Reference to a catalog card: type plus id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    /// The catalog the card belongs to.
    pub card_type: CardType,
    /// The catalog card id.
    pub card_id: CardId,
}

impl CardRef {
    /// Create a new card reference.
    #[must_use]
    pub const fn new(card_type: CardType, card_id: CardId) -> Self {
        Self { card_type, card_id }
    }
}

/// A user's holding of one catalog card.
///
/// Keyed by (user, card type, card id). Quantity is never negative; the row
/// is removed when the quantity reaches zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCard {
    /// The owning user.
    pub user_id: UserId,
    /// The catalog the card belongs to.
    pub card_type: CardType,
    /// The catalog card id.
    pub card_id: CardId,
    /// Copies held.
    pub quantity: i64,
    /// When the holding was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserCard {
    /// Create a holding with zero copies.
    #[must_use]
    pub fn new(user_id: UserId, card: CardRef) -> Self {
        Self {
            user_id,
            card_type: card.card_type,
            card_id: card.card_id,
            quantity: 0,
            updated_at: Utc::now(),
        }
    }

    /// The card reference for this holding.
    #[must_use]
    pub const fn card(&self) -> CardRef {
        CardRef::new(self.card_type, self.card_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_type_roundtrip() {
        for ty in CardType::all() {
            assert_eq!(ty.as_str().parse::<CardType>().unwrap(), ty);
        }
        assert!("tribe".parse::<CardType>().is_err());
    }

    #[test]
    fn rarity_sell_values_ascend() {
        let values = [
            Rarity::Common,
            Rarity::Uncommon,
            Rarity::Rare,
            Rarity::SuperRare,
            Rarity::UltraRare,
        ]
        .map(|r| r.sell_value_coins());
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rarity_parse_snake_case() {
        assert_eq!("super_rare".parse::<Rarity>().unwrap(), Rarity::SuperRare);
        assert!("mythic".parse::<Rarity>().is_err());
    }

    #[test]
    fn new_holding_is_empty() {
        let card = CardRef::new(CardType::Creature, CardId::generate());
        let holding = UserCard::new(UserId::generate(), card);
        assert_eq!(holding.quantity, 0);
        assert_eq!(holding.card(), card);
    }
}
