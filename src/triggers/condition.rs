//! Reaction conditions.
//!
//! Conditions decide whether a reaction template fires for a trigger. The
//! common filters are declarative; anything card-specific goes through
//! `Custom` with a closure that sees the same read-only view.

use std::sync::Arc;

use crate::cards::{CardLibrary, CardType};
use crate::core::{CardId, CardKey, Match, PlayerId, TurnPhase};
use crate::error::Result;
use crate::zones::{ZoneName, ZoneRegistry};

use super::event::Trigger;

/// Card-specific condition logic.
pub type ConditionFn = Arc<dyn Fn(&ConditionContext<'_>) -> Result<bool> + Send + Sync>;

/// A condition that must hold for a reaction to fire.
#[derive(Clone)]
pub enum ReactionCondition {
    // === Payload Filters ===

    /// Trigger is for the given player.
    ForPlayer(PlayerId),

    /// Trigger is for anyone but the given player.
    NotForPlayer(PlayerId),

    /// Triggering card is this exact copy.
    CardIs(CardId),

    /// Triggering card has this key.
    CardKeyIs(CardKey),

    /// Triggering card carries this type.
    CardHasType(CardType),

    /// Trigger names this phase.
    PhaseIs(TurnPhase),

    /// Gain came from a purchase.
    Bought,

    // === State Filters ===

    /// A card is currently in a zone with this name.
    CardInZone { card: CardId, zone: ZoneName },

    /// It is this player's turn.
    CurrentPlayerIs(PlayerId),

    // === Combinators ===

    All(Vec<ReactionCondition>),
    Any(Vec<ReactionCondition>),
    Not(Box<ReactionCondition>),

    // === Special ===

    Always,
    Never,
    Custom(ConditionFn),
}

impl std::fmt::Debug for ReactionCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ForPlayer(p) => f.debug_tuple("ForPlayer").field(p).finish(),
            Self::NotForPlayer(p) => f.debug_tuple("NotForPlayer").field(p).finish(),
            Self::CardIs(c) => f.debug_tuple("CardIs").field(c).finish(),
            Self::CardKeyIs(k) => f.debug_tuple("CardKeyIs").field(k).finish(),
            Self::CardHasType(t) => f.debug_tuple("CardHasType").field(t).finish(),
            Self::PhaseIs(p) => f.debug_tuple("PhaseIs").field(p).finish(),
            Self::Bought => f.write_str("Bought"),
            Self::CardInZone { card, zone } => f
                .debug_struct("CardInZone")
                .field("card", card)
                .field("zone", zone)
                .finish(),
            Self::CurrentPlayerIs(p) => f.debug_tuple("CurrentPlayerIs").field(p).finish(),
            Self::All(c) => f.debug_tuple("All").field(c).finish(),
            Self::Any(c) => f.debug_tuple("Any").field(c).finish(),
            Self::Not(c) => f.debug_tuple("Not").field(c).finish(),
            Self::Always => f.write_str("Always"),
            Self::Never => f.write_str("Never"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Default for ReactionCondition {
    fn default() -> Self {
        Self::Always
    }
}

impl ReactionCondition {
    /// Wrap a closure as a condition.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ConditionContext<'_>) -> Result<bool> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Create an AND condition.
    pub fn all(conditions: impl IntoIterator<Item = ReactionCondition>) -> Self {
        Self::All(conditions.into_iter().collect())
    }

    /// Create an OR condition.
    pub fn any(conditions: impl IntoIterator<Item = ReactionCondition>) -> Self {
        Self::Any(conditions.into_iter().collect())
    }

    /// Negate this condition.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Add another condition with AND.
    #[must_use]
    pub fn and(self, other: ReactionCondition) -> Self {
        match self {
            Self::All(mut conditions) => {
                conditions.push(other);
                Self::All(conditions)
            }
            Self::Always => other,
            _ => Self::All(vec![self, other]),
        }
    }

    /// Check the condition against a trigger and the current state.
    ///
    /// Errors from custom conditions propagate unchanged.
    pub fn evaluate(&self, ctx: &ConditionContext<'_>) -> Result<bool> {
        let trigger = ctx.trigger;
        Ok(match self {
            Self::ForPlayer(player) => trigger.player == Some(*player),

            Self::NotForPlayer(player) => trigger.player.is_some_and(|p| p != *player),

            Self::CardIs(card) => trigger.card == Some(*card),

            Self::CardKeyIs(key) => ctx.triggering_card_key() == Some(key),

            Self::CardHasType(card_type) => trigger
                .card
                .and_then(|id| ctx.cards.get(id))
                .is_some_and(|card| card.is(*card_type)),

            Self::PhaseIs(phase) => trigger.phase == Some(*phase),

            Self::Bought => trigger.bought,

            Self::CardInZone { card, zone } => ctx
                .zones
                .find_card_source(*card)
                .is_some_and(|location| location.zone.name == *zone),

            Self::CurrentPlayerIs(player) => ctx.state.current_player() == *player,

            Self::All(conditions) => {
                for condition in conditions {
                    if !condition.evaluate(ctx)? {
                        return Ok(false);
                    }
                }
                true
            }

            Self::Any(conditions) => {
                for condition in conditions {
                    if condition.evaluate(ctx)? {
                        return Ok(true);
                    }
                }
                false
            }

            Self::Not(inner) => !inner.evaluate(ctx)?,

            Self::Always => true,

            Self::Never => false,

            Self::Custom(f) => f(ctx)?,
        })
    }
}

/// Read-only view a condition is evaluated against.
pub struct ConditionContext<'a> {
    /// The trigger being checked.
    pub trigger: &'a Trigger,
    pub state: &'a Match,
    pub zones: &'a ZoneRegistry,
    pub cards: &'a CardLibrary,
}

impl<'a> ConditionContext<'a> {
    /// Create a new context.
    pub fn new(trigger: &'a Trigger, state: &'a Match, zones: &'a ZoneRegistry, cards: &'a CardLibrary) -> Self {
        Self {
            trigger,
            state,
            zones,
            cards,
        }
    }

    /// Key of the card named by the trigger.
    #[must_use]
    pub fn triggering_card_key(&self) -> Option<&'a CardKey> {
        let id = self.trigger.card?;
        self.cards.get(id).map(|card| &card.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::error::EngineError;
    use crate::triggers::TriggerKind;

    struct Fixture {
        state: Match,
        zones: ZoneRegistry,
        cards: CardLibrary,
    }

    fn fixture() -> Fixture {
        let mut cards = CardLibrary::new();
        cards.define(CardDefinition::new("copper", "Copper").with_type(CardType::Treasure));
        cards.define(CardDefinition::new("village", "Village").with_type(CardType::Action));
        cards.mint("copper".into(), Some(PlayerId::new(0)), 1).unwrap();
        cards.mint("village".into(), Some(PlayerId::new(0)), 1).unwrap();

        let mut zones = ZoneRegistry::new();
        zones.register_zone(ZoneName::Hand, vec![CardId(0)], Some(PlayerId::new(0)));
        zones.register_zone(ZoneName::PlayArea, vec![CardId(1)], Some(PlayerId::new(0)));

        Fixture {
            state: Match::new(2),
            zones,
            cards,
        }
    }

    fn check(f: &Fixture, trigger: &Trigger, condition: &ReactionCondition) -> bool {
        let ctx = ConditionContext::new(trigger, &f.state, &f.zones, &f.cards);
        condition.evaluate(&ctx).unwrap()
    }

    #[test]
    fn test_payload_filters() {
        let f = fixture();
        let trigger = Trigger::new(TriggerKind::CardPlayed)
            .with_player(PlayerId::new(0))
            .with_card(CardId(0));

        assert!(check(&f, &trigger, &ReactionCondition::ForPlayer(PlayerId::new(0))));
        assert!(!check(&f, &trigger, &ReactionCondition::ForPlayer(PlayerId::new(1))));
        assert!(check(&f, &trigger, &ReactionCondition::NotForPlayer(PlayerId::new(1))));
        assert!(check(&f, &trigger, &ReactionCondition::CardIs(CardId(0))));
        assert!(check(&f, &trigger, &ReactionCondition::CardKeyIs("copper".into())));
        assert!(check(&f, &trigger, &ReactionCondition::CardHasType(CardType::Treasure)));
        assert!(!check(&f, &trigger, &ReactionCondition::CardHasType(CardType::Action)));
        assert!(!check(&f, &trigger, &ReactionCondition::Bought));
    }

    #[test]
    fn test_state_filters() {
        let f = fixture();
        let trigger = Trigger::new(TriggerKind::StartTurn);

        let in_play = ReactionCondition::CardInZone {
            card: CardId(1),
            zone: ZoneName::PlayArea,
        };
        assert!(check(&f, &trigger, &in_play));
        assert!(check(&f, &trigger, &ReactionCondition::CurrentPlayerIs(PlayerId::new(0))));
    }

    #[test]
    fn test_combinators() {
        let f = fixture();
        let trigger = Trigger::new(TriggerKind::StartTurnPhase).with_phase(TurnPhase::Buy);

        let buy = ReactionCondition::PhaseIs(TurnPhase::Buy);
        let action = ReactionCondition::PhaseIs(TurnPhase::Action);

        assert!(check(&f, &trigger, &ReactionCondition::any([action.clone(), buy.clone()])));
        assert!(!check(&f, &trigger, &ReactionCondition::all([action.clone(), buy.clone()])));
        assert!(check(&f, &trigger, &action.negate()));
        assert!(!check(&f, &trigger, &ReactionCondition::Never));
        assert!(check(&f, &trigger, &ReactionCondition::Always.and(buy)));
    }

    #[test]
    fn test_custom_condition_error_propagates() {
        let f = fixture();
        let trigger = Trigger::new(TriggerKind::EndTurn);
        let failing = ReactionCondition::custom(|_| Err(EngineError::Effect("boom".into())));

        let ctx = ConditionContext::new(&trigger, &f.state, &f.zones, &f.cards);
        assert!(failing.evaluate(&ctx).is_err());
    }
}
