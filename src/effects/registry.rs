//! Effect registry.
//!
//! Everything card-specific the engine calls is registered here during
//! setup: play effects by card key, card-like (event) effects, lifecycle
//! hooks per card key, expansion-wide game hooks, and custom actions. The
//! engine freezes the registry behind an `Arc` once the match is built.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use rustc_hash::FxHashMap;

use crate::actions::ActionOutcome;
use crate::core::CardKey;
use crate::engine::Engine;
use crate::error::Result;
use crate::triggers::LifecycleEvent;

use super::context::{CardEffect, CustomAction, EffectContext, LifecycleCall, LifecycleHook};

/// Lookup table for card code.
///
/// Registration panics on duplicates, as card wiring errors are setup
/// bugs.
#[derive(Clone, Default)]
pub struct EffectRegistry {
    card_effects: FxHashMap<CardKey, CardEffect>,
    card_like_effects: FxHashMap<CardKey, CardEffect>,
    card_hooks: FxHashMap<(CardKey, LifecycleEvent), LifecycleHook>,

    /// Game hooks by event, as (expansion, hook) in registration order.
    game_hooks: FxHashMap<LifecycleEvent, Vec<(String, LifecycleHook)>>,

    custom_actions: FxHashMap<String, CustomAction>,
}

impl EffectRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Registration ===

    /// Register the effect run when a card with `key` is played.
    pub fn register_card_effect<F>(&mut self, key: impl Into<CardKey>, effect: F)
    where
        F: for<'a> Fn(EffectContext<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.card_effects.contains_key(&key) {
            panic!("Card effect for `{key}` already registered");
        }
        self.card_effects.insert(key, Arc::new(effect));
    }

    /// Register the effect run when the card-like `key` is bought.
    pub fn register_card_like_effect<F>(&mut self, key: impl Into<CardKey>, effect: F)
    where
        F: for<'a> Fn(EffectContext<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        let key = key.into();
        if self.card_like_effects.contains_key(&key) {
            panic!("Card-like effect for `{key}` already registered");
        }
        self.card_like_effects.insert(key, Arc::new(effect));
    }

    /// Register a card lifecycle hook.
    ///
    /// Panics if `event` is a game-scoped event.
    pub fn register_lifecycle_hook<F>(&mut self, key: impl Into<CardKey>, event: LifecycleEvent, hook: F)
    where
        F: for<'a> Fn(LifecycleCall<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        assert!(!event.is_game_event(), "`{event}` is a game event, use register_game_hook");
        let key = key.into();
        if self.card_hooks.contains_key(&(key.clone(), event)) {
            panic!("Lifecycle hook `{event}` for `{key}` already registered");
        }
        self.card_hooks.insert((key, event), Arc::new(hook));
    }

    /// Register an expansion-wide game hook.
    ///
    /// Panics if `event` is a card-scoped event.
    pub fn register_game_hook<F>(&mut self, expansion: impl Into<String>, event: LifecycleEvent, hook: F)
    where
        F: for<'a> Fn(LifecycleCall<'a>) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        assert!(event.is_game_event(), "`{event}` is a card event, use register_lifecycle_hook");
        self.game_hooks
            .entry(event)
            .or_default()
            .push((expansion.into(), Arc::new(hook)));
    }

    /// Register a handler for `Action::Custom { name, .. }`.
    pub fn register_custom_action<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: for<'a> Fn(&'a mut Engine, serde_json::Value) -> BoxFuture<'a, Result<ActionOutcome>>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.custom_actions.contains_key(&name) {
            panic!("Custom action `{name}` already registered");
        }
        self.custom_actions.insert(name, Arc::new(handler));
    }

    // === Lookup ===

    #[must_use]
    pub fn card_effect(&self, key: &CardKey) -> Option<CardEffect> {
        self.card_effects.get(key).cloned()
    }

    #[must_use]
    pub fn card_like_effect(&self, key: &CardKey) -> Option<CardEffect> {
        self.card_like_effects.get(key).cloned()
    }

    #[must_use]
    pub fn lifecycle_hook(&self, key: &CardKey, event: LifecycleEvent) -> Option<LifecycleHook> {
        self.card_hooks.get(&(key.clone(), event)).cloned()
    }

    /// Game hooks for an event, in registration order.
    #[must_use]
    pub fn game_hooks(&self, event: LifecycleEvent) -> Vec<(String, LifecycleHook)> {
        self.game_hooks.get(&event).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn custom_action(&self, name: &str) -> Option<CustomAction> {
        self.custom_actions.get(name).cloned()
    }

    /// Is `key` registered as a card-like?
    #[must_use]
    pub fn is_card_like(&self, key: &CardKey) -> bool {
        self.card_like_effects.contains_key(key)
    }
}

impl std::fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRegistry")
            .field("card_effects", &self.card_effects.len())
            .field("card_like_effects", &self.card_like_effects.len())
            .field("card_hooks", &self.card_hooks.len())
            .field("game_hooks", &self.game_hooks.values().map(Vec::len).sum::<usize>())
            .field("custom_actions", &self.custom_actions.len())
            .finish()
    }
}
