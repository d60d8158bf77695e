//! Cost rules.
//!
//! The engine asks a `PriceRules` implementation what a card costs a
//! player right now and whether they may buy it at all. `StandardPrices`
//! reads the printed cost and applies the match's price overrides.

use serde::{Deserialize, Serialize};

use crate::cards::{CardLibrary, Cost};
use crate::core::{CardKey, Match, PlayerId};
use crate::error::{EngineError, Result};

/// Result of applying the price rules to one card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceResult {
    /// The card may not be bought this turn.
    pub restricted: bool,
    pub cost: Cost,
}

/// Price rules collaborator.
///
/// Closures with the same signature implement it directly.
pub trait PriceRules: Send + Sync {
    fn apply_rules(&self, state: &Match, cards: &CardLibrary, key: &CardKey, player: PlayerId) -> Result<PriceResult>;
}

impl<F> PriceRules for F
where
    F: Fn(&Match, &CardLibrary, &CardKey, PlayerId) -> Result<PriceResult> + Send + Sync,
{
    fn apply_rules(&self, state: &Match, cards: &CardLibrary, key: &CardKey, player: PlayerId) -> Result<PriceResult> {
        self(state, cards, key, player)
    }
}

/// Printed cost plus `Match::price_overrides`.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardPrices;

impl PriceRules for StandardPrices {
    fn apply_rules(&self, state: &Match, cards: &CardLibrary, key: &CardKey, _player: PlayerId) -> Result<PriceResult> {
        let definition = cards
            .definition(key)
            .ok_or_else(|| EngineError::UnknownCardKey(key.clone()))?;

        let mut result = PriceResult {
            restricted: false,
            cost: definition.cost,
        };

        if let Some(adjustment) = state.price_overrides.get(key) {
            result.cost.treasure = apply_delta(result.cost.treasure, adjustment.treasure_delta);
            result.cost.potion = apply_delta(result.cost.potion, adjustment.potion_delta);
            result.restricted = adjustment.restricted;
        }

        Ok(result)
    }
}

fn apply_delta(value: u32, delta: i32) -> u32 {
    (i64::from(value) + i64::from(delta)).max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::PriceOverride;

    fn library() -> CardLibrary {
        let mut cards = CardLibrary::new();
        cards.define(CardDefinition::new("smithy", "Smithy").with_cost(Cost::treasure(4)));
        cards.define(CardDefinition::new("alchemist", "Alchemist").with_cost(Cost::treasure(3).with_potion(1)));
        cards
    }

    #[test]
    fn test_printed_cost() {
        let cards = library();
        let state = Match::new(2);

        let price = StandardPrices
            .apply_rules(&state, &cards, &"alchemist".into(), PlayerId::new(0))
            .unwrap();

        assert_eq!(price.cost, Cost::treasure(3).with_potion(1));
        assert!(!price.restricted);
    }

    #[test]
    fn test_override_clamps_at_zero() {
        let cards = library();
        let mut state = Match::new(2);
        state.price_overrides.insert(
            "smithy".into(),
            PriceOverride {
                treasure_delta: -6,
                potion_delta: 0,
                restricted: true,
            },
        );

        let price = StandardPrices
            .apply_rules(&state, &cards, &"smithy".into(), PlayerId::new(0))
            .unwrap();

        assert_eq!(price.cost.treasure, 0);
        assert!(price.restricted);
    }

    #[test]
    fn test_unknown_key() {
        let cards = library();
        let state = Match::new(2);

        let err = StandardPrices
            .apply_rules(&state, &cards, &"gold".into(), PlayerId::new(0))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownCardKey(_)));
    }

    #[test]
    fn test_closure_rules() {
        let cards = library();
        let state = Match::new(2);
        let free = |_: &Match, _: &CardLibrary, _: &CardKey, _: PlayerId| Ok(PriceResult::default());

        let price = free.apply_rules(&state, &cards, &"smithy".into(), PlayerId::new(0)).unwrap();
        assert_eq!(price.cost, Cost::default());
    }
}
