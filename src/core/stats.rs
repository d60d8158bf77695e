//! Per-turn, per-card statistics ledger.
//!
//! Every gain, buy, play and trash appends one [`StatEntry`]. Entries are
//! indexed twice, by turn number and by card id, and are never removed, so
//! cards can ask questions like "how many actions did I play this turn?" or
//! "was this copy bought or gained?".

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::entity::{CardId, CardKey};
use super::player::PlayerId;
use crate::cards::Cost;

/// What happened to the card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatKind {
    Gained,
    Bought,
    Played,
    Trashed,
}

/// One ledger row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub kind: StatKind,
    pub turn: u32,
    pub player: Option<PlayerId>,
    pub card: CardId,
    pub key: CardKey,
    /// Amount paid, for `Bought` entries (cost plus overpay).
    pub paid: Option<Cost>,
}

/// Append-only ledger indexed by turn and by card.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatsLedger {
    by_turn: FxHashMap<u32, Vector<StatEntry>>,
    by_card: FxHashMap<CardId, Vector<StatEntry>>,
}

impl StatsLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&mut self, entry: StatEntry) {
        self.by_card
            .entry(entry.card)
            .or_default()
            .push_back(entry.clone());
        self.by_turn.entry(entry.turn).or_default().push_back(entry);
    }

    /// Entries recorded during a turn, oldest first.
    pub fn for_turn(&self, turn: u32) -> impl Iterator<Item = &StatEntry> {
        self.by_turn.get(&turn).into_iter().flat_map(|v| v.iter())
    }

    /// Entries recorded for one card, oldest first.
    pub fn for_card(&self, card: CardId) -> impl Iterator<Item = &StatEntry> {
        self.by_card.get(&card).into_iter().flat_map(|v| v.iter())
    }

    /// Count entries of `kind` for `player` during `turn`.
    #[must_use]
    pub fn count(&self, kind: StatKind, turn: u32, player: PlayerId) -> usize {
        self.for_turn(turn)
            .filter(|e| e.kind == kind && e.player == Some(player))
            .count()
    }

    /// Has this card ever had an entry of `kind`?
    #[must_use]
    pub fn card_has(&self, card: CardId, kind: StatKind) -> bool {
        self.for_card(card).any(|e| e.kind == kind)
    }

    /// Total number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_turn.values().map(Vector::len).sum()
    }

    /// Check if the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
