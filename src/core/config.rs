//! Engine configuration and zone naming.
//!
//! Matches configure the engine at startup by providing:
//! - `ZoneName` / `ZoneRef`: which zones exist and who owns them
//! - `TurnPhase`: the phases of a turn
//! - `EngineConfig`: hand size, turn resources, input timeout, zone layout
//!
//! `EngineConfig` deserializes from JSON so orchestrators can keep match
//! presets in files:
//!
//! ```
//! use kingdom_engine::core::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{ "hand_size": 6, "seed": 9 }"#).unwrap();
//! assert_eq!(config.hand_size, 6);
//! assert_eq!(config.turn_actions, 1);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::{EngineError, Result};

/// Name of a zone.
///
/// The common piles are named variants; expansions add their own with
/// `Custom`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ZoneName {
    Deck,
    Hand,
    Discard,
    PlayArea,
    /// Duration cards waiting for a later turn.
    Duration,
    SetAside,
    Revealed,
    Trash,
    /// Basic supply piles (treasures, victory cards, curses).
    Supply,
    /// Kingdom piles chosen for this match.
    Kingdom,
    /// Card-likes that can be bought but are never gained (events).
    Events,
    Custom(String),
}

impl ZoneName {
    /// Is this one of the zones a played card sits in?
    #[must_use]
    pub fn is_play_zone(&self) -> bool {
        matches!(self, ZoneName::PlayArea | ZoneName::Duration)
    }

    /// Is this a pile cards are bought or gained from?
    #[must_use]
    pub fn is_pile_zone(&self) -> bool {
        matches!(self, ZoneName::Supply | ZoneName::Kingdom)
    }
}

impl std::fmt::Display for ZoneName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneName::Deck => f.write_str("deck"),
            ZoneName::Hand => f.write_str("hand"),
            ZoneName::Discard => f.write_str("discard"),
            ZoneName::PlayArea => f.write_str("playArea"),
            ZoneName::Duration => f.write_str("activeDuration"),
            ZoneName::SetAside => f.write_str("setAside"),
            ZoneName::Revealed => f.write_str("revealed"),
            ZoneName::Trash => f.write_str("trash"),
            ZoneName::Supply => f.write_str("supply"),
            ZoneName::Kingdom => f.write_str("kingdom"),
            ZoneName::Events => f.write_str("events"),
            ZoneName::Custom(name) => f.write_str(name),
        }
    }
}

/// A concrete zone: a name, plus the owning player for per-player zones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneRef {
    pub name: ZoneName,
    pub player: Option<PlayerId>,
}

impl ZoneRef {
    /// A per-player zone.
    #[must_use]
    pub fn player(name: ZoneName, player: PlayerId) -> Self {
        Self {
            name,
            player: Some(player),
        }
    }

    /// A zone shared by every player.
    #[must_use]
    pub fn shared(name: ZoneName) -> Self {
        Self { name, player: None }
    }

    #[must_use]
    pub fn hand(player: PlayerId) -> Self {
        Self::player(ZoneName::Hand, player)
    }

    #[must_use]
    pub fn deck(player: PlayerId) -> Self {
        Self::player(ZoneName::Deck, player)
    }

    #[must_use]
    pub fn discard(player: PlayerId) -> Self {
        Self::player(ZoneName::Discard, player)
    }

    #[must_use]
    pub fn play_area(player: PlayerId) -> Self {
        Self::player(ZoneName::PlayArea, player)
    }

    #[must_use]
    pub fn trash() -> Self {
        Self::shared(ZoneName::Trash)
    }
}

impl std::fmt::Display for ZoneRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.player {
            Some(player) => write!(f, "{}[{}]", self.name, player.0),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The phases of a turn, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    #[default]
    Action,
    Buy,
    Cleanup,
}

impl TurnPhase {
    /// All phases in turn order.
    pub const ALL: [TurnPhase; 3] = [TurnPhase::Action, TurnPhase::Buy, TurnPhase::Cleanup];

    /// Position within the turn (action = 0).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            TurnPhase::Action => 0,
            TurnPhase::Buy => 1,
            TurnPhase::Cleanup => 2,
        }
    }

    /// The following phase, or `None` once the turn's phases are exhausted.
    #[must_use]
    pub const fn next(self) -> Option<TurnPhase> {
        match self {
            TurnPhase::Action => Some(TurnPhase::Buy),
            TurnPhase::Buy => Some(TurnPhase::Cleanup),
            TurnPhase::Cleanup => None,
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Action => f.write_str("action"),
            TurnPhase::Buy => f.write_str("buy"),
            TurnPhase::Cleanup => f.write_str("cleanup"),
        }
    }
}

/// Engine-wide settings.
///
/// Every field has a default, so a JSON preset only names what it changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Cards drawn at cleanup and for the opening hand.
    pub hand_size: usize,

    /// Actions granted at the start of each turn.
    pub turn_actions: u32,

    /// Buys granted at the start of each turn.
    pub turn_buys: u32,

    /// How long a prompt or selection waits for its player, in milliseconds.
    /// `None` waits forever.
    pub input_timeout_ms: Option<u64>,

    /// Seed for every shuffle in the match.
    pub seed: u64,

    /// Advance automatically out of phases with nothing left to do.
    pub auto_skip_phases: bool,

    /// Zones registered once per player.
    pub player_zones: Vec<ZoneName>,

    /// Zones registered once for the whole match.
    pub shared_zones: Vec<ZoneName>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hand_size: 5,
            turn_actions: 1,
            turn_buys: 1,
            input_timeout_ms: Some(60_000),
            seed: 0,
            auto_skip_phases: true,
            player_zones: vec![
                ZoneName::Deck,
                ZoneName::Hand,
                ZoneName::Discard,
                ZoneName::PlayArea,
                ZoneName::Duration,
                ZoneName::SetAside,
                ZoneName::Revealed,
            ],
            shared_zones: vec![
                ZoneName::Supply,
                ZoneName::Kingdom,
                ZoneName::Events,
                ZoneName::Trash,
            ],
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON preset.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the turn loop cannot run with.
    ///
    /// With auto-skip on, a turn with no buys and no action card in hand
    /// has nothing to stop on, so phases would cycle without end.
    pub fn validate(&self) -> Result<()> {
        if self.auto_skip_phases && self.turn_buys == 0 {
            return Err(EngineError::InvalidConfig(
                "turn_buys must be at least 1 when auto_skip_phases is set".into(),
            ));
        }
        Ok(())
    }

    /// The input timeout as a `Duration`.
    #[must_use]
    pub fn input_timeout(&self) -> Option<Duration> {
        self.input_timeout_ms.map(Duration::from_millis)
    }

    /// Set the RNG seed (builder pattern).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the hand size (builder pattern).
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the input timeout (builder pattern).
    #[must_use]
    pub fn with_input_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.input_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Enable or disable phase auto-skip (builder pattern).
    #[must_use]
    pub fn with_auto_skip(mut self, enabled: bool) -> Self {
        self.auto_skip_phases = enabled;
        self
    }

    /// Register an extra per-player zone (builder pattern).
    #[must_use]
    pub fn with_player_zone(mut self, zone: ZoneName) -> Self {
        if !self.player_zones.contains(&zone) {
            self.player_zones.push(zone);
        }
        self
    }

    /// Register an extra shared zone (builder pattern).
    #[must_use]
    pub fn with_shared_zone(mut self, zone: ZoneName) -> Self {
        if !self.shared_zones.contains(&zone) {
            self.shared_zones.push(zone);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert_eq!(TurnPhase::Action.next(), Some(TurnPhase::Buy));
        assert_eq!(TurnPhase::Buy.next(), Some(TurnPhase::Cleanup));
        assert_eq!(TurnPhase::Cleanup.next(), None);
        assert_eq!(TurnPhase::Cleanup.index(), 2);
    }

    #[test]
    fn test_zone_ref_display() {
        assert_eq!(ZoneRef::hand(PlayerId::new(1)).to_string(), "hand[1]");
        assert_eq!(ZoneRef::trash().to_string(), "trash");
        assert_eq!(
            ZoneRef::shared(ZoneName::Custom("island".into())).to_string(),
            "island"
        );
    }

    #[test]
    fn test_play_zones() {
        assert!(ZoneName::PlayArea.is_play_zone());
        assert!(ZoneName::Duration.is_play_zone());
        assert!(!ZoneName::Hand.is_play_zone());
        assert!(ZoneName::Kingdom.is_pile_zone());
    }

    #[test]
    fn test_config_defaults_fill_missing_fields() {
        let config = EngineConfig::from_json(r#"{ "auto_skip_phases": false }"#).unwrap();

        assert!(!config.auto_skip_phases);
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.input_timeout(), Some(Duration::from_secs(60)));
        assert!(config.shared_zones.contains(&ZoneName::Trash));
    }

    #[test]
    fn test_config_rejects_bad_json() {
        assert!(EngineConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_zero_buys_needs_auto_skip_off() {
        let result = EngineConfig::from_json(r#"{ "turn_buys": 0 }"#);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));

        let config = EngineConfig::from_json(r#"{ "turn_buys": 0, "auto_skip_phases": false }"#).unwrap();
        assert_eq!(config.turn_buys, 0);
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::default()
            .with_seed(3)
            .with_hand_size(4)
            .with_input_timeout(None)
            .with_player_zone(ZoneName::Custom("tavern".into()))
            .with_player_zone(ZoneName::Hand);

        assert_eq!(config.seed, 3);
        assert_eq!(config.hand_size, 4);
        assert_eq!(config.input_timeout(), None);
        assert_eq!(config.player_zones.len(), 8);
    }

    #[test]
    fn test_config_round_trip() {
        let config = EngineConfig::default().with_seed(11);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
