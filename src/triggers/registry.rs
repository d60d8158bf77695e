//! Reaction bus storage.
//!
//! The bus stores reaction templates and indexes them by the trigger kind
//! they listen for. Lifecycle hooks register templates when a card enters
//! a reactive zone and unregister them when it leaves; the engine walks the
//! index when a trigger fires.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use rustc_hash::FxHashMap;

use crate::cards::Card;
use crate::core::{CardId, CardKey, PlayerId};
use crate::effects::{ReactionCall, ReactionEffect};
use crate::error::Result;

use super::condition::ReactionCondition;
use super::context::ReactionOutcome;
use super::event::{ReactionId, TriggerKind};

/// A listener bound to one card instance.
///
/// Defaults: fires every time, compulsory, and stacks with other copies of
/// the same card.
#[derive(Clone)]
pub struct ReactionTemplate {
    /// Unique identifier, derived from card and trigger kind.
    pub id: ReactionId,

    /// The card instance this template belongs to.
    pub card: CardId,

    /// Key of that card.
    pub card_key: CardKey,

    /// Player who owns the reaction and answers its prompt.
    pub owner: PlayerId,

    /// Trigger kind this template listens for.
    pub listens_for: TriggerKind,

    pub condition: ReactionCondition,

    pub effect: ReactionEffect,

    /// Unregister after the first firing.
    pub once: bool,

    /// Fire without asking the owner.
    pub compulsory: bool,

    /// Several copies of this card may fire for the same trigger.
    pub allow_multiple_instances: bool,
}

impl ReactionTemplate {
    /// Create a template for `card`, owned by `owner`.
    pub fn new<F>(card: &Card, owner: PlayerId, listens_for: TriggerKind, effect: F) -> Self
    where
        F: for<'a> Fn(ReactionCall<'a>) -> BoxFuture<'a, Result<ReactionOutcome>> + Send + Sync + 'static,
    {
        Self {
            id: ReactionId::new(&card.key, card.id, &listens_for),
            card: card.id,
            card_key: card.key.clone(),
            owner,
            listens_for,
            condition: ReactionCondition::Always,
            effect: Arc::new(effect),
            once: false,
            compulsory: true,
            allow_multiple_instances: true,
        }
    }

    /// Set the condition (builder pattern).
    #[must_use]
    pub fn with_condition(mut self, condition: ReactionCondition) -> Self {
        self.condition = condition;
        self
    }

    /// Fire at most once (builder pattern).
    #[must_use]
    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }

    /// Ask the owner before firing (builder pattern).
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.compulsory = false;
        self
    }

    /// Only one copy of this card fires per trigger (builder pattern).
    #[must_use]
    pub fn single_instance(mut self) -> Self {
        self.allow_multiple_instances = false;
        self
    }
}

impl std::fmt::Debug for ReactionTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactionTemplate")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("listens_for", &self.listens_for)
            .field("condition", &self.condition)
            .field("once", &self.once)
            .field("compulsory", &self.compulsory)
            .field("allow_multiple_instances", &self.allow_multiple_instances)
            .finish_non_exhaustive()
    }
}

/// Registry of active reaction templates.
#[derive(Clone, Debug, Default)]
pub struct ReactionBus {
    templates: FxHashMap<ReactionId, ReactionTemplate>,

    /// Index by trigger kind, in registration order.
    by_kind: FxHashMap<TriggerKind, Vec<ReactionId>>,
}

impl ReactionBus {
    /// Create a new empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, returns its ID.
    ///
    /// A template with the same id replaces the old one and moves to the
    /// end of the firing order.
    pub fn register_reaction_template(&mut self, template: ReactionTemplate) -> ReactionId {
        let id = template.id.clone();
        if self.unregister_trigger(&id).is_some() {
            tracing::debug!(%id, "reaction template replaced");
        }

        self.by_kind
            .entry(template.listens_for.clone())
            .or_default()
            .push(id.clone());
        self.templates.insert(id.clone(), template);
        id
    }

    /// Unregister a template.
    pub fn unregister_trigger(&mut self, id: &ReactionId) -> Option<ReactionTemplate> {
        let template = self.templates.remove(id)?;
        if let Some(list) = self.by_kind.get_mut(&template.listens_for) {
            list.retain(|other| other != id);
            if list.is_empty() {
                self.by_kind.remove(&template.listens_for);
            }
        }
        Some(template)
    }

    /// Get a template by ID.
    #[must_use]
    pub fn get(&self, id: &ReactionId) -> Option<&ReactionTemplate> {
        self.templates.get(id)
    }

    /// Check if a template is registered.
    #[must_use]
    pub fn contains(&self, id: &ReactionId) -> bool {
        self.templates.contains_key(id)
    }

    /// Snapshot of the ids listening for a kind, in registration order.
    #[must_use]
    pub fn listening_for(&self, kind: &TriggerKind) -> Vec<ReactionId> {
        self.by_kind.get(kind).cloned().unwrap_or_default()
    }

    /// Templates bound to a card instance.
    pub fn for_card(&self, card: CardId) -> impl Iterator<Item = &ReactionTemplate> {
        self.templates.values().filter(move |t| t.card == card)
    }

    /// Remove every template bound to a card instance.
    pub fn remove_for_card(&mut self, card: CardId) {
        let ids: Vec<_> = self.for_card(card).map(|t| t.id.clone()).collect();
        for id in ids {
            self.unregister_trigger(&id);
        }
    }

    /// Get total template count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the bus is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;

    fn card(id: u32, key: &str) -> Card {
        Card::from_definition(CardId(id), &CardDefinition::new(key, key))
    }

    fn template(card: &Card, kind: TriggerKind) -> ReactionTemplate {
        ReactionTemplate::new(card, PlayerId::new(0), kind, |_call| {
            Box::pin(async { Ok(ReactionOutcome::Normal) })
        })
    }

    #[test]
    fn test_template_defaults() {
        let moat = card(3, "moat");
        let t = template(&moat, TriggerKind::CardPlayed);

        assert_eq!(t.id.as_str(), "moat:3:cardPlayed");
        assert!(t.compulsory);
        assert!(!t.once);
        assert!(t.allow_multiple_instances);

        let t = t.once().optional().single_instance();
        assert!(t.once && !t.compulsory && !t.allow_multiple_instances);
    }

    #[test]
    fn test_register_keeps_registration_order() {
        let mut bus = ReactionBus::new();
        let a = card(1, "a");
        let b = card(2, "b");
        let c = card(3, "c");

        let id_b = bus.register_reaction_template(template(&b, TriggerKind::CardPlayed));
        let id_a = bus.register_reaction_template(template(&a, TriggerKind::CardPlayed));
        bus.register_reaction_template(template(&c, TriggerKind::EndTurn));

        assert_eq!(bus.listening_for(&TriggerKind::CardPlayed), vec![id_b, id_a]);
        assert_eq!(bus.len(), 3);
        assert!(bus.listening_for(&TriggerKind::CardGained).is_empty());
    }

    #[test]
    fn test_unregister() {
        let mut bus = ReactionBus::new();
        let moat = card(3, "moat");
        let id = bus.register_reaction_template(template(&moat, TriggerKind::CardPlayed));

        assert!(bus.unregister_trigger(&id).is_some());
        assert!(bus.unregister_trigger(&id).is_none());
        assert!(bus.is_empty());
        assert!(bus.listening_for(&TriggerKind::CardPlayed).is_empty());
    }

    #[test]
    fn test_reregister_replaces() {
        let mut bus = ReactionBus::new();
        let a = card(1, "a");
        let b = card(2, "b");

        let id_a = bus.register_reaction_template(template(&a, TriggerKind::EndTurn));
        let id_b = bus.register_reaction_template(template(&b, TriggerKind::EndTurn));
        bus.register_reaction_template(template(&a, TriggerKind::EndTurn).once());

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.listening_for(&TriggerKind::EndTurn), vec![id_b, id_a.clone()]);
        assert!(bus.get(&id_a).unwrap().once);
    }

    #[test]
    fn test_remove_for_card() {
        let mut bus = ReactionBus::new();
        let moat = card(3, "moat");
        bus.register_reaction_template(template(&moat, TriggerKind::CardPlayed));
        bus.register_reaction_template(template(&moat, TriggerKind::EndTurn));

        bus.remove_for_card(CardId(3));

        assert!(bus.is_empty());
    }
}
