//! Card instances - one physical copy.
//!
//! A `Card` is created once at setup and never destroyed. Trashing a card
//! clears its owner but leaves it in the library, so stats and logs can
//! keep referring to it.
//!
//! ## Neutral Cards
//!
//! Supply cards have no owner until someone gains them.

use serde::{Deserialize, Serialize};

use super::definition::{CardDefinition, CardType, CardTypes};
use crate::core::{CardId, CardKey, PlayerId};

/// A card instance in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id of this copy.
    pub id: CardId,

    /// Rules identity.
    pub key: CardKey,

    /// Type tags, copied from the definition.
    pub types: CardTypes,

    /// Current owner. `None` for supply and trashed cards.
    pub owner: Option<PlayerId>,

    /// Descriptive tags, copied from the definition.
    pub tags: Vec<String>,
}

impl Card {
    /// Create an unowned copy of a definition.
    #[must_use]
    pub fn from_definition(id: CardId, definition: &CardDefinition) -> Self {
        Self {
            id,
            key: definition.key.clone(),
            types: definition.types.clone(),
            owner: None,
            tags: definition.tags.clone(),
        }
    }

    /// Set the owner (builder pattern).
    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Does this copy carry the type tag?
    #[must_use]
    pub fn is(&self, card_type: CardType) -> bool {
        self.types.contains(&card_type)
    }

    /// Check if this is an unowned card.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.owner.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Cost;

    fn militia() -> CardDefinition {
        CardDefinition::new("militia", "Militia")
            .with_type(CardType::Action)
            .with_type(CardType::Attack)
            .with_cost(Cost::treasure(4))
    }

    #[test]
    fn test_from_definition_is_neutral() {
        let card = Card::from_definition(CardId(3), &militia());

        assert!(card.is_neutral());
        assert_eq!(card.key.as_str(), "militia");
        assert!(card.is(CardType::Attack));
    }

    #[test]
    fn test_with_owner() {
        let card = Card::from_definition(CardId(3), &militia()).with_owner(PlayerId::new(1));

        assert_eq!(card.owner, Some(PlayerId::new(1)));
        assert!(!card.is_neutral());
    }

    #[test]
    fn test_card_serialization() {
        let card = Card::from_definition(CardId(9), &militia()).with_owner(PlayerId::new(0));
        let json = serde_json::to_string(&card).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
