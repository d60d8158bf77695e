//! Game log.
//!
//! The game log is what players see ("Player 1 plays Village"). It is a
//! collaborator behind the [`LogSink`] trait, separate from the `tracing`
//! diagnostics the engine emits for operators.
//!
//! ## Scoping
//!
//! Effects, reactions and hooks run inside a [`LogScope`]. The guard calls
//! `enter()` when created and `exit()` when dropped, so nested entries are
//! indented under the card that caused them and the pair stays balanced
//! even when the callee returns an error.
//!
//! ```
//! use std::sync::Arc;
//! use kingdom_engine::log::{LogEntry, LogKind, LogScope, LogSink, MemoryLog};
//!
//! let log = Arc::new(MemoryLog::new());
//! log.add_log_entry(LogEntry::new(LogKind::Play));
//! {
//!     let _scope = LogScope::enter(log.clone());
//!     log.add_log_entry(LogEntry::new(LogKind::Draw).with_count(3));
//! }
//!
//! let depths: Vec<_> = log.entries().iter().map(|e| e.depth).collect();
//! assert_eq!(depths, vec![0, 1]);
//! assert_eq!(log.depth(), 0);
//! ```

mod memory;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};

pub use memory::MemoryLog;

/// What a log entry records.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogKind {
    Draw,
    Play,
    Buy,
    Gain,
    Trash,
    Discard,
    Reveal,
    Shuffle,
    GainAction,
    GainBuy,
    GainTreasure,
    GainPotion,
    GainCoffer,
    ExchangeCoffer,
    GainVictoryToken,
    NewTurn,
    NewPlayerTurn,
    Custom(String),
}

/// One line of the game log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub kind: LogKind,
    pub player: Option<PlayerId>,
    pub card: Option<CardId>,

    /// Card whose effect produced this entry.
    pub source: Option<CardId>,

    pub count: Option<i64>,

    /// Nesting depth, assigned by the sink.
    pub depth: usize,
}

impl LogEntry {
    /// Create an entry with no payload.
    #[must_use]
    pub fn new(kind: LogKind) -> Self {
        Self {
            kind,
            player: None,
            card: None,
            source: None,
            count: None,
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }
}

/// Log collaborator.
pub trait LogSink: Send + Sync {
    fn add_log_entry(&self, entry: LogEntry);

    /// Start a nested section.
    fn enter(&self);

    /// End the innermost nested section.
    fn exit(&self);
}

/// RAII guard pairing `enter()` with `exit()`.
#[must_use = "the scope exits as soon as the guard is dropped"]
pub struct LogScope {
    sink: Arc<dyn LogSink>,
}

impl LogScope {
    /// Enter a nested section of `sink`.
    pub fn enter(sink: Arc<dyn LogSink>) -> Self {
        sink.enter();
        Self { sink }
    }
}

impl Drop for LogScope {
    fn drop(&mut self) {
        self.sink.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_exits_on_early_return() {
        fn failing(log: Arc<dyn LogSink>) -> Result<(), ()> {
            let _scope = LogScope::enter(log);
            Err(())
        }

        let log = Arc::new(MemoryLog::new());
        assert!(failing(log.clone()).is_err());
        assert_eq!(log.depth(), 0);
    }

    #[test]
    fn test_nested_scopes() {
        let log = Arc::new(MemoryLog::new());
        let outer = LogScope::enter(log.clone());
        let inner = LogScope::enter(log.clone());
        assert_eq!(log.depth(), 2);

        drop(inner);
        assert_eq!(log.depth(), 1);
        drop(outer);
        assert_eq!(log.depth(), 0);
    }

    #[test]
    fn test_entry_serialization() {
        let entry = LogEntry::new(LogKind::GainCoffer)
            .with_player(PlayerId::new(1))
            .with_count(2);
        let json = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
