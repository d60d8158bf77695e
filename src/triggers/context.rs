//! Per-trigger reaction outcomes.
//!
//! A `ReactionContext` lives for one triggering action. Reactions record
//! their outcome per player and later targeting in the same action reads
//! it back (an attack skips every immune player).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// What a reaction did for its owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionOutcome {
    #[default]
    Normal,
    /// The owner is unaffected by the rest of the triggering action.
    Immunity,
}

/// Outcomes recorded while one trigger resolves.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionContext {
    outcomes: FxHashMap<PlayerId, ReactionOutcome>,
}

impl ReactionContext {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome for a player.
    ///
    /// `Immunity` is sticky: a later `Normal` never clears it.
    pub fn record(&mut self, player: PlayerId, outcome: ReactionOutcome) {
        let entry = self.outcomes.entry(player).or_default();
        if outcome == ReactionOutcome::Immunity {
            *entry = outcome;
        }
    }

    /// Outcome recorded for a player, if any.
    #[must_use]
    pub fn outcome(&self, player: PlayerId) -> Option<ReactionOutcome> {
        self.outcomes.get(&player).copied()
    }

    /// Is the player immune for the rest of this action?
    #[must_use]
    pub fn is_immune(&self, player: PlayerId) -> bool {
        self.outcome(player) == Some(ReactionOutcome::Immunity)
    }

    /// Players that reacted with immunity.
    pub fn immune_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.outcomes
            .iter()
            .filter(|(_, &outcome)| outcome == ReactionOutcome::Immunity)
            .map(|(&player, _)| player)
    }

    /// Check if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}
