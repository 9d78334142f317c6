//! Bounded FIFO history ledger

use crate::entry::HistoryEntry;
use crate::stats::Statistics;
use parking_lot::RwLock;
use std::collections::VecDeque;

/// Default number of entries retained
pub const DEFAULT_CAPACITY: usize = 100;

/// Hard cap on entries returned by [`HistoryLedger::recent`]
pub const MAX_RECENT: usize = 100;

/// Bounded, insertion-ordered history of analyses.
///
/// A single lock guards the buffer: `record` evicts and appends under one
/// write guard, and readers always see a whole snapshot.
pub struct HistoryLedger {
    capacity: usize,
    entries: RwLock<VecDeque<HistoryEntry>>,
}

impl HistoryLedger {
    /// Create a ledger holding at most `capacity` entries (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append an entry, evicting the oldest first when full
    pub fn record(&self, entry: HistoryEntry) {
        let mut entries = self.entries.write();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most recent entries first, at most `min(limit, MAX_RECENT)` of them
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let entries = self.entries.read();
        newest_first(&entries, limit)
    }

    /// Current size and `recent(limit)`, read under one guard
    pub fn snapshot(&self, limit: usize) -> (usize, Vec<HistoryEntry>) {
        let entries = self.entries.read();
        (entries.len(), newest_first(&entries, limit))
    }

    /// Aggregate statistics over the current contents
    pub fn statistics(&self) -> Statistics {
        let entries = self.entries.read();
        Statistics::from_entries(entries.iter())
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let removed = entries.len();
        entries.clear();
        tracing::info!("History ledger cleared ({} entries removed)", removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

fn newest_first(entries: &VecDeque<HistoryEntry>, limit: usize) -> Vec<HistoryEntry> {
    entries
        .iter()
        .rev()
        .take(limit.min(MAX_RECENT))
        .cloned()
        .collect()
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
