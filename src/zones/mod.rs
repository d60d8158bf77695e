//! Zone system for card locations.
//!
//! Zones are **match-configured**: the engine registers the per-player and
//! shared zones named in `EngineConfig`, and expansions may register more.
//!
//! ## Key Types
//!
//! - `ZoneName` / `ZoneRef`: zone identity (from `core::config`)
//! - `ZoneRegistry`: the live piles of card ids
//! - `ZonePosition`: where to insert into a pile
//! - `CardLocation`: result of looking a card up

pub mod manager;

pub use manager::{CardLocation, ZonePosition, ZoneRegistry};

// Re-export zone types from core for convenience
pub use crate::core::config::{ZoneName, ZoneRef};
