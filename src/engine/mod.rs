//! The engine aggregate.
//!
//! One [`Engine`] owns everything a match mutates: the [`Match`] counters
//! and turn structure, the zone registry, the card library and the
//! reaction bus. It also holds the collaborators: the frozen effect
//! registry, price rules, the log sink and the player input channels.
//!
//! Actions take `&mut Engine`, so a second action can never start while
//! one is in flight; nested actions reborrow the same engine.
//!
//! ## Building
//!
//! Use [`MatchBuilder`]:
//!
//! ```
//! use kingdom_engine::engine::MatchBuilder;
//! use kingdom_engine::games::base;
//!
//! # tokio_test_block(async {
//! let mut engine = MatchBuilder::new(2)
//!     .with_cards(base::definitions())
//!     .with_effects(base::effects())
//!     .with_supply_pile("copper", 46)
//!     .with_supply_pile("estate", 8)
//!     .build()
//!     .unwrap();
//!
//! engine.start().await.unwrap();
//! assert_eq!(engine.hand(engine.current_player()).len(), 5);
//! # });
//! # fn tokio_test_block(f: impl std::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(f)
//! # }
//! ```

mod builder;
mod reactions;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::cards::{CardLibrary, CardType};
use crate::core::{CardId, CardKey, EngineConfig, GameRng, Match, PlayerId, Resource, ZoneName, ZoneRef};
use crate::effects::EffectRegistry;
use crate::error::Result;
use crate::input::{InputRequest, PlayerInputs};
use crate::log::{LogEntry, LogSink};
use crate::rules::{PriceResult, PriceRules};
use crate::triggers::{LifecycleArgs, LifecycleEvent, ReactionBus, ReactionContext};
use crate::zones::ZoneRegistry;

pub use builder::MatchBuilder;

/// Rules engine for one match.
pub struct Engine {
    /// Turn structure, counters, stats, overrides.
    pub state: Match,

    pub zones: ZoneRegistry,

    pub cards: CardLibrary,

    /// Active reaction templates.
    pub reactions: ReactionBus,

    pub config: EngineConfig,

    pub(crate) effects: Arc<EffectRegistry>,
    pub(crate) prices: Box<dyn PriceRules>,
    pub(crate) log: Arc<dyn LogSink>,
    pub(crate) inputs: PlayerInputs,
    pub(crate) rng: GameRng,

    /// Cards whose effects are currently running, innermost last.
    pub(crate) sources: Vec<CardId>,
}

impl Engine {
    // === Collaborators ===

    /// The frozen effect registry.
    #[must_use]
    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// The log sink.
    #[must_use]
    pub fn log(&self) -> &Arc<dyn LogSink> {
        &self.log
    }

    /// Add an entry to the game log.
    ///
    /// Entries without a source are attributed to the innermost running
    /// card effect.
    pub fn add_log_entry(&self, mut entry: LogEntry) {
        if entry.source.is_none() {
            entry.source = self.sources.last().copied();
        }
        self.log.add_log_entry(entry);
    }

    /// What `key` costs `player` right now.
    pub fn price_of(&self, key: &CardKey, player: PlayerId) -> Result<PriceResult> {
        self.prices.apply_rules(&self.state, &self.cards, key, player)
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    // === Input ===

    /// Open an input channel for a player, replacing any previous one.
    pub fn connect_player(&mut self, player: PlayerId) -> mpsc::UnboundedReceiver<InputRequest> {
        self.inputs.connect(player)
    }

    /// Drop a player's input channel. Their future requests resolve to
    /// "no selection".
    pub fn disconnect_player(&mut self, player: PlayerId) {
        self.inputs.disconnect(player);
    }

    #[must_use]
    pub fn input_timeout(&self) -> Option<Duration> {
        self.config.input_timeout()
    }

    // === Queries ===

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.state.current_player()
    }

    /// Cards in a player's hand, bottom first.
    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &[CardId] {
        self.zones.cards_in(&ZoneRef::hand(player))
    }

    /// Players an attack affects: everyone else in turn order starting to
    /// the left of the current player, minus immune players.
    #[must_use]
    pub fn targets(&self, reaction_context: &ReactionContext) -> Vec<PlayerId> {
        let count = self.state.player_count();
        self.current_player()
            .others(count)
            .filter(|player| !reaction_context.is_immune(*player))
            .collect()
    }

    /// Top card of the supply or kingdom pile for `key`.
    #[must_use]
    pub fn pile_top(&self, key: &CardKey) -> Option<CardId> {
        [ZoneName::Supply, ZoneName::Kingdom].into_iter().find_map(|name| {
            self.zones
                .cards_in(&ZoneRef::shared(name))
                .iter()
                .rev()
                .copied()
                .find(|&id| self.cards.get(id).is_some_and(|card| &card.key == key))
        })
    }

    /// Cards remaining in the pile for `key`.
    #[must_use]
    pub fn pile_size(&self, key: &CardKey) -> usize {
        [ZoneName::Supply, ZoneName::Kingdom]
            .into_iter()
            .flat_map(|name| self.zones.cards_in(&ZoneRef::shared(name)).iter())
            .filter(|&&id| self.cards.get(id).is_some_and(|card| &card.key == key))
            .count()
    }

    /// Pile keys `player` can afford and is allowed to buy.
    pub fn buyable(&self, player: PlayerId) -> Result<Vec<CardKey>> {
        let treasure = self.state.resource(player, Resource::Treasure);
        let potions = self.state.resource(player, Resource::Potions);

        let mut keys = Vec::new();
        for key in self.state.supply.supply.iter().chain(&self.state.supply.kingdom) {
            if self.pile_top(key).is_none() {
                continue;
            }
            let price = self.price_of(key, player)?;
            if !price.restricted && price.cost.treasure <= treasure && price.cost.potion <= potions {
                keys.push(key.clone());
            }
        }
        Ok(keys)
    }

    /// Printed points of every card `player` owns, plus victory tokens.
    #[must_use]
    pub fn victory_points(&self, player: PlayerId) -> i32 {
        let printed: i32 = self
            .cards
            .cards()
            .filter(|card| card.owner == Some(player))
            .filter_map(|card| self.cards.definition(&card.key))
            .map(|definition| definition.victory_points)
            .sum();
        printed + self.state.resource(player, Resource::VictoryTokens) as i32
    }

    /// Does `player` hold a card of `card_type` in hand?
    #[must_use]
    pub fn hand_has(&self, player: PlayerId, card_type: CardType) -> bool {
        self.hand(player)
            .iter()
            .any(|&id| self.cards.get(id).is_some_and(|card| card.is(card_type)))
    }

    // === Lifecycle ===

    /// Start the match: run `OnGameStart`, shuffle every deck, draw
    /// opening hands and begin the first player's turn.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!(players = self.state.player_count(), seed = self.rng.seed(), "match starting");

        self.run_game_lifecycle_event(LifecycleEvent::OnGameStart, LifecycleArgs::default())
            .await?;

        let players = self.state.players().to_vec();
        for &player in &players {
            self.zones.shuffle(&ZoneRef::deck(player), &mut self.rng)?;
        }
        for &player in &players {
            self.draw_card(player, self.config.hand_size).await?;
        }

        self.begin_turn().await?;
        self.check_for_remaining_player_actions().await
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("zones", &self.zones)
            .field("reactions", &self.reactions)
            .field("effects", &self.effects)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Cost};
    use crate::core::PriceOverride;

    fn engine() -> Engine {
        MatchBuilder::new(3)
            .with_config(EngineConfig::default().with_seed(7))
            .with_card(CardDefinition::new("copper", "Copper").with_type(CardType::Treasure))
            .with_card(
                CardDefinition::new("estate", "Estate")
                    .with_type(CardType::Victory)
                    .with_cost(Cost::treasure(2))
                    .with_victory_points(1),
            )
            .with_card(
                CardDefinition::new("duchy", "Duchy")
                    .with_type(CardType::Victory)
                    .with_cost(Cost::treasure(5))
                    .with_victory_points(3),
            )
            .with_supply_pile("copper", 10)
            .with_supply_pile("estate", 2)
            .with_supply_pile("duchy", 1)
            .build()
            .unwrap()
    }

    #[test]
    fn test_targets_skip_immune_and_start_left() {
        let mut engine = engine();
        engine.state.current_player_index = 1;

        let mut ctx = ReactionContext::new();
        assert_eq!(engine.targets(&ctx), vec![PlayerId::new(2), PlayerId::new(0)]);

        ctx.record(PlayerId::new(2), crate::triggers::ReactionOutcome::Immunity);
        assert_eq!(engine.targets(&ctx), vec![PlayerId::new(0)]);
    }

    #[test]
    fn test_pile_top_and_size() {
        let engine = engine();

        let top = engine.pile_top(&"estate".into()).unwrap();
        assert_eq!(engine.cards.get(top).unwrap().key.as_str(), "estate");
        assert_eq!(engine.pile_size(&"estate".into()), 2);
        assert!(engine.pile_top(&"gold".into()).is_none());
    }

    #[test]
    fn test_buyable() {
        let mut engine = engine();
        let p0 = PlayerId::new(0);
        engine.state.adjust(p0, Resource::Treasure, 2);

        assert_eq!(engine.buyable(p0).unwrap(), vec![CardKey::from("copper"), CardKey::from("estate")]);

        engine.state.price_overrides.insert(
            "estate".into(),
            PriceOverride {
                restricted: true,
                ..PriceOverride::default()
            },
        );
        assert_eq!(engine.buyable(p0).unwrap(), vec![CardKey::from("copper")]);
    }

    #[test]
    fn test_victory_points() {
        let mut engine = engine();
        let p0 = PlayerId::new(0);

        // Starting deck: 3 estates.
        assert_eq!(engine.victory_points(p0), 3);

        engine.state.adjust(p0, Resource::VictoryTokens, 2);
        assert_eq!(engine.victory_points(p0), 5);
    }
}
