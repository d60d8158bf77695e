//! Card definitions - static card data.
//!
//! `CardDefinition` holds the unchanging properties shared by every copy
//! of a card: its key, types, cost, coin and victory values. Instance data
//! (owner, id) lives in `Card`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardKey;

/// Type tags a card can carry. Most cards have one or two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardType {
    Action,
    Treasure,
    Victory,
    Curse,
    Attack,
    Reaction,
    Duration,
    /// Bought like a card but never gained (events, projects).
    Event,
}

/// Inline storage for a card's type tags.
pub type CardTypes = SmallVec<[CardType; 3]>;

/// Price of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    pub treasure: u32,
    pub potion: u32,
}

impl Cost {
    /// A treasure-only cost.
    #[must_use]
    pub const fn treasure(treasure: u32) -> Self {
        Self { treasure, potion: 0 }
    }

    /// Add potions to the cost (builder pattern).
    #[must_use]
    pub const fn with_potion(mut self, potion: u32) -> Self {
        self.potion = potion;
        self
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn plus(self, other: Cost) -> Cost {
        Cost {
            treasure: self.treasure + other.treasure,
            potion: self.potion + other.potion,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use kingdom_engine::cards::{CardDefinition, CardType, Cost};
///
/// let market = CardDefinition::new("market", "Market")
///     .with_type(CardType::Action)
///     .with_cost(Cost::treasure(5));
///
/// assert!(market.is(CardType::Action));
/// assert_eq!(market.cost.treasure, 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Rules identity.
    pub key: CardKey,

    /// Display name.
    pub name: String,

    pub types: CardTypes,

    /// Printed cost, before price rules.
    pub cost: Cost,

    /// Coins produced when played as a treasure.
    #[serde(default)]
    pub treasure: u32,

    /// Victory points at game end.
    #[serde(default)]
    pub victory_points: i32,

    /// Free-form descriptive tags ("base", "cantrip", ...).
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CardDefinition {
    /// Create a new card definition with no types and zero cost.
    #[must_use]
    pub fn new(key: impl Into<CardKey>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            types: CardTypes::new(),
            cost: Cost::default(),
            treasure: 0,
            victory_points: 0,
            tags: Vec::new(),
        }
    }

    /// Add a type tag (builder pattern).
    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        if !self.types.contains(&card_type) {
            self.types.push(card_type);
        }
        self
    }

    /// Set the cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: Cost) -> Self {
        self.cost = cost;
        self
    }

    /// Set the coin value (builder pattern).
    #[must_use]
    pub fn with_treasure(mut self, treasure: u32) -> Self {
        self.treasure = treasure;
        self
    }

    /// Set the victory points (builder pattern).
    #[must_use]
    pub fn with_victory_points(mut self, points: i32) -> Self {
        self.victory_points = points;
        self
    }

    /// Add a descriptive tag (builder pattern).
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Does this card carry the type tag?
    #[must_use]
    pub fn is(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }
}
