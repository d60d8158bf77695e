//! Match setup.

use std::sync::Arc;

use crate::cards::{CardDefinition, CardLibrary};
use crate::core::{CardKey, EngineConfig, GameRng, Match, PlayerId, SupplyConfig, ZoneName, ZoneRef};
use crate::effects::EffectRegistry;
use crate::error::Result;
use crate::input::PlayerInputs;
use crate::log::{LogSink, MemoryLog};
use crate::rules::{PriceRules, StandardPrices};
use crate::triggers::ReactionBus;
use crate::zones::ZoneRegistry;

use super::Engine;

/// Builder for creating an [`Engine`].
///
/// Defaults: `EngineConfig::default()`, `StandardPrices`, a `MemoryLog`,
/// and a starting deck of 7 copper and 3 estate (whichever of the two are
/// defined).
pub struct MatchBuilder {
    player_count: usize,
    config: EngineConfig,
    definitions: Vec<CardDefinition>,
    supply: Vec<(CardKey, usize)>,
    kingdom: Vec<(CardKey, usize)>,
    events: Vec<CardKey>,
    starting_deck: Option<Vec<(CardKey, usize)>>,
    effects: EffectRegistry,
    prices: Option<Box<dyn PriceRules>>,
    log: Option<Arc<dyn LogSink>>,
}

impl MatchBuilder {
    /// Start a match for `player_count` players.
    ///
    /// Panics unless the count is 1-8.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        assert!((1..=8).contains(&player_count), "Player count must be 1-8");
        Self {
            player_count,
            config: EngineConfig::default(),
            definitions: Vec::new(),
            supply: Vec::new(),
            kingdom: Vec::new(),
            events: Vec::new(),
            starting_deck: None,
            effects: EffectRegistry::new(),
            prices: None,
            log: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a card definition.
    #[must_use]
    pub fn with_card(mut self, definition: CardDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    /// Add several card definitions.
    #[must_use]
    pub fn with_cards(mut self, definitions: impl IntoIterator<Item = CardDefinition>) -> Self {
        self.definitions.extend(definitions);
        self
    }

    /// Add a basic supply pile of `count` copies.
    #[must_use]
    pub fn with_supply_pile(mut self, key: impl Into<CardKey>, count: usize) -> Self {
        self.supply.push((key.into(), count));
        self
    }

    /// Add a kingdom pile of `count` copies.
    #[must_use]
    pub fn with_kingdom_pile(mut self, key: impl Into<CardKey>, count: usize) -> Self {
        self.kingdom.push((key.into(), count));
        self
    }

    /// Make a card-like (event) available to buy.
    #[must_use]
    pub fn with_event(mut self, key: impl Into<CardKey>) -> Self {
        self.events.push(key.into());
        self
    }

    /// Replace the default starting deck.
    #[must_use]
    pub fn with_starting_deck(mut self, deck: impl IntoIterator<Item = (CardKey, usize)>) -> Self {
        self.starting_deck = Some(deck.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: EffectRegistry) -> Self {
        self.effects = effects;
        self
    }

    /// Register more card code on the builder's registry.
    pub fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }

    #[must_use]
    pub fn with_prices(mut self, prices: impl PriceRules + 'static) -> Self {
        self.prices = Some(Box::new(prices));
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = Some(log);
        self
    }

    /// Build the engine: mint every card, register zones, and deal the
    /// starting decks. No cards are drawn until `Engine::start`.
    pub fn build(self) -> Result<Engine> {
        self.config.validate()?;

        let mut cards = CardLibrary::new();
        for definition in self.definitions {
            cards.define(definition);
        }

        let mut zones = ZoneRegistry::new();
        for player in PlayerId::all(self.player_count) {
            for name in &self.config.player_zones {
                zones.register_zone(name.clone(), Vec::new(), Some(player));
            }
        }
        for name in &self.config.shared_zones {
            zones.register_zone(name.clone(), Vec::new(), None);
        }

        let starting_deck = self.starting_deck.unwrap_or_else(|| {
            [("copper", 7), ("estate", 3)]
                .into_iter()
                .map(|(key, count)| (CardKey::from(key), count))
                .filter(|(key, _)| cards.definition(key).is_some())
                .collect()
        });

        for player in PlayerId::all(self.player_count) {
            for (key, count) in &starting_deck {
                let ids = cards.mint(key.clone(), Some(player), *count)?;
                zones.get_source(&ZoneRef::deck(player))?.extend(ids);
            }
        }

        for (name, piles) in [(ZoneName::Supply, &self.supply), (ZoneName::Kingdom, &self.kingdom)] {
            for (key, count) in piles {
                let ids = cards.mint(key.clone(), None, *count)?;
                zones.get_source(&ZoneRef::shared(name.clone()))?.extend(ids);
            }
        }
        for key in &self.events {
            let ids = cards.mint(key.clone(), None, 1)?;
            zones.get_source(&ZoneRef::shared(ZoneName::Events))?.extend(ids);
        }

        let mut state = Match::new(self.player_count);
        state.supply = SupplyConfig {
            supply: self.supply.into_iter().map(|(key, _)| key).collect(),
            kingdom: self.kingdom.into_iter().map(|(key, _)| key).collect(),
            events: self.events,
        };

        tracing::debug!(
            players = self.player_count,
            cards = cards.len(),
            zones = zones.zones().count(),
            "match built"
        );

        Ok(Engine {
            state,
            zones,
            cards,
            reactions: ReactionBus::new(),
            rng: GameRng::new(self.config.seed),
            config: self.config,
            effects: Arc::new(self.effects),
            prices: self.prices.unwrap_or_else(|| Box::new(StandardPrices)),
            log: self.log.unwrap_or_else(|| Arc::new(MemoryLog::new())),
            inputs: PlayerInputs::new(),
            sources: Vec::new(),
        })
    }
}
