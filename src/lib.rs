//! # kingdom-engine
//!
//! Server-side rules engine for multiplayer deck-building card games.
//!
//! ## Design Principles
//!
//! 1. **Card-Agnostic**: The engine knows zones, counters, phases and
//!    triggers. What a card does is supplied as async callbacks in an
//!    `EffectRegistry`.
//!
//! 2. **N-Player First**: Every API takes a `PlayerId`. Targeting walks
//!    the seats in turn order starting to the left of the current player.
//!
//! 3. **One Mutable Aggregate**: A match is one `Engine`, mutated through
//!    `&mut`. Card code receives the same engine in its context and calls
//!    back into `Engine::invoke`.
//!
//! ## Architecture
//!
//! - **Actions**: every state change is an `Action` variant dispatched by
//!   `Engine::invoke`. Actions chain (buy → gain → move) by awaiting one
//!   another.
//!
//! - **Reactions**: card instances install `ReactionTemplate`s on the
//!   `ReactionBus`; each action broadcasts a `Trigger` through them.
//!   Reactions may grant immunity for the rest of the triggering action.
//!
//! - **Player Input**: `SelectCard` and `UserPrompt` suspend on a tokio
//!   channel per player, with a timeout. Missing answers degrade to "no
//!   selection".
//!
//! ## Modules
//!
//! - `core`: Card ids, players, match state, stats, RNG, configuration
//! - `zones`: Zone registry
//! - `cards`: Card definitions, instances and the card library
//! - `triggers`: Triggers, reaction templates, lifecycle events
//! - `effects`: Effect registry and callback contexts
//! - `rules`: Price rules
//! - `log`: Game log sink and scoping
//! - `input`: Player input channels and providers
//! - `actions`: The action catalogue and dispatch
//! - `engine`: The engine aggregate and match setup
//! - `games`: Example card sets

pub mod core;
pub mod zones;
pub mod cards;
pub mod triggers;
pub mod effects;
pub mod rules;
pub mod log;
pub mod input;
pub mod actions;
pub mod engine;
pub mod games;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    CardId, CardKey, PlayerId, PlayerMap,
    GameRng, GameRngState,
    EngineConfig, TurnPhase, ZoneName, ZoneRef,
    Match, Resource, StatEntry, StatKind,
};

pub use crate::zones::{CardLocation, ZonePosition, ZoneRegistry};

pub use crate::cards::{Card, CardDefinition, CardLibrary, CardType, Cost};

pub use crate::triggers::{
    LifecycleArgs, LifecycleEvent,
    ReactionBus, ReactionCondition, ReactionContext, ReactionId, ReactionOutcome, ReactionTemplate,
    Trigger, TriggerKind,
};

pub use crate::effects::{EffectContext, EffectRegistry, LifecycleCall, ReactionCall};

pub use crate::rules::{PriceResult, PriceRules, StandardPrices};

pub use crate::log::{LogEntry, LogKind, LogScope, LogSink, MemoryLog};

pub use crate::input::{InputProvider, InputRequest, PromptPayload, PromptResponse, SelectCount, SelectPayload};

pub use crate::actions::{Action, ActionOutcome};

pub use crate::engine::{Engine, MatchBuilder};

pub use crate::error::{EngineError, Result};
