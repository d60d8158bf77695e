//! Match state: the single mutable aggregate for one game in progress.
//!
//! ## Match
//!
//! - Turn progression: current player, round, turn, phase
//! - Per-player resource counters
//! - Statistics ledger
//! - Supply configuration and per-match overrides
//!
//! Card locations live in the zone registry and card data in the card
//! library; both sit next to the `Match` inside the engine.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::config::{TurnPhase, ZoneRef};
use super::entity::{CardId, CardKey};
use super::player::{PlayerId, PlayerMap};
use super::stats::StatsLedger;

/// A per-player resource counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Actions,
    Buys,
    Treasure,
    Potions,
    Coffers,
    VictoryTokens,
}

/// Resource counters for one player. Never negative.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounters {
    pub actions: u32,
    pub buys: u32,
    pub treasure: u32,
    pub potions: u32,
    pub coffers: u32,
    pub victory_tokens: u32,
}

impl ResourceCounters {
    /// Read a counter.
    #[must_use]
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Actions => self.actions,
            Resource::Buys => self.buys,
            Resource::Treasure => self.treasure,
            Resource::Potions => self.potions,
            Resource::Coffers => self.coffers,
            Resource::VictoryTokens => self.victory_tokens,
        }
    }

    /// Apply a signed change, clamping at zero. Returns the new value.
    pub fn adjust(&mut self, resource: Resource, delta: i64) -> u32 {
        let slot = match resource {
            Resource::Actions => &mut self.actions,
            Resource::Buys => &mut self.buys,
            Resource::Treasure => &mut self.treasure,
            Resource::Potions => &mut self.potions,
            Resource::Coffers => &mut self.coffers,
            Resource::VictoryTokens => &mut self.victory_tokens,
        };
        let next = (i64::from(*slot) + delta).clamp(0, i64::from(u32::MAX));
        *slot = next as u32;
        *slot
    }

    /// Reset the turn-scoped counters for a new turn.
    pub fn reset_turn(&mut self, actions: u32, buys: u32) {
        self.actions = actions;
        self.buys = buys;
        self.treasure = 0;
        self.potions = 0;
    }
}

/// Which card keys are available this match.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyConfig {
    /// Basic piles: treasures, victory cards, curses.
    pub supply: Vec<CardKey>,
    /// Kingdom piles.
    pub kingdom: Vec<CardKey>,
    /// Card-likes bought without being gained.
    pub events: Vec<CardKey>,
}

/// A price adjustment applied by the standard price rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub treasure_delta: i32,
    pub potion_delta: i32,
    /// Forbid buying the card outright.
    pub restricted: bool,
}

/// Mutable state of one match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Match {
    players: Vec<PlayerId>,

    /// Index into the player list of whose turn it is.
    pub current_player_index: usize,

    /// Round number (starts at 1, +1 whenever play returns to the first player).
    pub round_number: u32,

    /// Turn number (starts at 1, +1 per completed action/buy/cleanup cycle).
    pub turn_number: u32,

    /// Current phase of the turn.
    pub phase: TurnPhase,

    /// Resource counters per player.
    pub counters: PlayerMap<ResourceCounters>,

    /// Gain/buy/play/trash history.
    pub stats: StatsLedger,

    /// Available piles and events.
    pub supply: SupplyConfig,

    /// Redirects the next gain of a card to a different zone.
    pub zone_overrides: FxHashMap<CardId, ZoneRef>,

    /// Price adjustments by card key.
    pub price_overrides: FxHashMap<CardKey, PriceOverride>,
}

impl Match {
    /// Create a new match for `player_count` players, first player to act.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            players: PlayerId::all(player_count).collect(),
            current_player_index: 0,
            round_number: 1,
            turn_number: 1,
            phase: TurnPhase::Action,
            counters: PlayerMap::with_default(player_count),
            stats: StatsLedger::new(),
            supply: SupplyConfig::default(),
            zone_overrides: FxHashMap::default(),
            price_overrides: FxHashMap::default(),
        }
    }

    /// Players in seating order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.players[self.current_player_index]
    }

    /// Numeric position of the current phase within the turn.
    #[must_use]
    pub fn turn_phase_index(&self) -> usize {
        self.phase.index()
    }

    /// Read a player's counter.
    #[must_use]
    pub fn resource(&self, player: PlayerId, resource: Resource) -> u32 {
        self.counters[player].get(resource)
    }

    /// Change a player's counter, clamping at zero. Returns the new value.
    pub fn adjust(&mut self, player: PlayerId, resource: Resource, delta: i64) -> u32 {
        self.counters[player].adjust(resource, delta)
    }

    /// Move the turn to the next seat. Returns `true` when play wrapped
    /// around to the first player.
    pub fn advance_player(&mut self) -> bool {
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.current_player_index == 0
    }
}
