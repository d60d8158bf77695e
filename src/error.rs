//! Error types for the rules engine.
//!
//! Only programmer-level failures become errors. Expected gaps (a card
//! with no previous zone, a player with no input connection, an empty
//! pile) are logged with `tracing::warn!` and the action carries on.

use thiserror::Error;

use crate::core::{CardId, CardKey, ZoneRef};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no handler registered for action `{0}`")]
    NoHandler(String),

    #[error("zone {0} is not registered")]
    ZoneNotRegistered(ZoneRef),

    #[error("move of card {card} names {count} destinations, expected exactly one")]
    InvalidDestination { card: CardId, count: usize },

    #[error("card {0} has no previous location")]
    NoPreviousLocation(CardId),

    #[error("unknown card {0}")]
    UnknownCard(CardId),

    #[error("unknown card key `{0}`")]
    UnknownCardKey(CardKey),

    #[error("card {0} cannot be bought as a card-like")]
    NotACardLike(CardKey),

    #[error("effect failed: {0}")]
    Effect(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
