//! In-memory log sink.

use std::sync::{Mutex, MutexGuard, PoisonError};

use im::Vector;

use super::{LogEntry, LogKind, LogSink};

#[derive(Debug, Default)]
struct Inner {
    entries: Vector<LogEntry>,
    depth: usize,
}

/// Log sink that keeps every entry in memory.
///
/// Each entry is also mirrored to `tracing` at trace level.
#[derive(Debug, Default)]
pub struct MemoryLog {
    inner: Mutex<Inner>,
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vector<LogEntry> {
        self.lock().entries.clone()
    }

    /// Number of entries of a kind.
    #[must_use]
    pub fn count(&self, kind: &LogKind) -> usize {
        self.lock().entries.iter().filter(|e| e.kind == *kind).count()
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lock().depth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}

impl LogSink for MemoryLog {
    fn add_log_entry(&self, mut entry: LogEntry) {
        let mut inner = self.lock();
        entry.depth = inner.depth;
        tracing::trace!(
            kind = ?entry.kind,
            player = ?entry.player,
            card = ?entry.card,
            source = ?entry.source,
            count = ?entry.count,
            depth = entry.depth,
            "game log"
        );
        inner.entries.push_back(entry);
    }

    fn enter(&self) {
        self.lock().depth += 1;
    }

    fn exit(&self) {
        let mut inner = self.lock();
        if inner.depth == 0 {
            tracing::warn!("log exit without matching enter");
        }
        inner.depth = inner.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_entries_keep_order_and_depth() {
        let log = MemoryLog::new();
        log.add_log_entry(LogEntry::new(LogKind::Play).with_player(PlayerId::new(0)));
        log.enter();
        log.add_log_entry(LogEntry::new(LogKind::Draw));
        log.add_log_entry(LogEntry::new(LogKind::Draw));
        log.exit();

        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].depth, 0);
        assert_eq!(entries[2].depth, 1);
        assert_eq!(log.count(&LogKind::Draw), 2);
    }

    #[test]
    fn test_unbalanced_exit_saturates() {
        let log = MemoryLog::new();
        log.exit();
        assert_eq!(log.depth(), 0);
        assert!(log.is_empty());
    }
}
