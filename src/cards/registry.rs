//! Card library: definitions by key and instances by id.
//!
//! The library is the card lookup table the engine consumes. Definitions
//! are registered at setup; instances are minted from them and live for
//! the whole match.

use rustc_hash::FxHashMap;

use super::definition::CardDefinition;
use super::instance::Card;
use crate::core::{CardId, CardKey, PlayerId};
use crate::error::{EngineError, Result};

/// Registry of card definitions and the instances minted from them.
///
/// ## Example
///
/// ```
/// use kingdom_engine::cards::{CardDefinition, CardLibrary, CardType};
///
/// let mut library = CardLibrary::new();
/// library.define(CardDefinition::new("copper", "Copper").with_type(CardType::Treasure));
///
/// let coppers = library.mint("copper".into(), None, 7).unwrap();
/// assert_eq!(coppers.len(), 7);
/// assert!(library.get(coppers[0]).unwrap().is_neutral());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardLibrary {
    definitions: FxHashMap<CardKey, CardDefinition>,
    cards: FxHashMap<CardId, Card>,
    next_id: u32,
}

impl CardLibrary {
    /// Create a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card definition.
    ///
    /// Panics if a definition with the same key already exists.
    pub fn define(&mut self, definition: CardDefinition) {
        if self.definitions.contains_key(&definition.key) {
            panic!("Card `{}` already defined", definition.key);
        }
        self.definitions.insert(definition.key.clone(), definition);
    }

    /// Mint `count` new copies of a defined card.
    pub fn mint(&mut self, key: CardKey, owner: Option<PlayerId>, count: usize) -> Result<Vec<CardId>> {
        let definition = self
            .definitions
            .get(&key)
            .ok_or_else(|| EngineError::UnknownCardKey(key.clone()))?;

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = CardId(self.next_id);
            self.next_id += 1;

            let mut card = Card::from_definition(id, definition);
            card.owner = owner;
            self.cards.insert(id, card);
            ids.push(id);
        }
        Ok(ids)
    }

    /// Get a card instance.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Get a mutable card instance.
    pub fn get_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.get_mut(&id)
    }

    /// Get a card instance or fail with `UnknownCard`.
    pub fn require(&self, id: CardId) -> Result<&Card> {
        self.cards.get(&id).ok_or(EngineError::UnknownCard(id))
    }

    /// Get a definition by key.
    #[must_use]
    pub fn definition(&self, key: &CardKey) -> Option<&CardDefinition> {
        self.definitions.get(key)
    }

    /// Get the definition behind a card instance.
    pub fn definition_of(&self, id: CardId) -> Result<&CardDefinition> {
        let card = self.require(id)?;
        self.definitions
            .get(&card.key)
            .ok_or_else(|| EngineError::UnknownCardKey(card.key.clone()))
    }

    /// Iterate over every card instance.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Iterate over every definition.
    pub fn definitions(&self) -> impl Iterator<Item = &CardDefinition> {
        self.definitions.values()
    }

    /// Number of card instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if no cards were minted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
