//! Core engine types: card ids, players, match state, statistics, RNG,
//! configuration.
//!
//! These are the building blocks every other module shares. Matches
//! configure them via `EngineConfig` rather than modifying the core.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod stats;
pub mod state;

pub use entity::{CardId, CardKey};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{EngineConfig, TurnPhase, ZoneName, ZoneRef};
pub use stats::{StatEntry, StatKind, StatsLedger};
pub use state::{Match, PriceOverride, Resource, ResourceCounters, SupplyConfig};
