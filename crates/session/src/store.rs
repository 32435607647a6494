// TVD - Time-Travel VM Debugger
// Copyright (C) 2026 TVD contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Published execution history.
//!
//! The store wraps the engine's recorded history behind an atomic swap:
//! [`ExecutionHistoryStore::publish`] is the only mutator, and readers
//! always observe either the previous full sequence or the new one, never a
//! mix. Snapshots are cheap `Arc` clones, so the inspection UI can hold one
//! across a publish without blocking anything.

use std::sync::Arc;

use parking_lot::RwLock;

use tvd_common::HistoryEntry;

/// Atomically published execution history for the current input.
#[derive(Debug, Clone, Default)]
pub struct ExecutionHistoryStore {
    inner: Arc<RwLock<Arc<[HistoryEntry]>>>,
}

impl ExecutionHistoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the published history wholesale. Called after each
    /// successful engine interaction; entries are never patched in place.
    pub fn publish(&self, entries: Vec<HistoryEntry>) {
        *self.inner.write() = entries.into();
    }

    /// The current full history, oldest first.
    pub fn snapshot(&self) -> Arc<[HistoryEntry]> {
        self.inner.read().clone()
    }

    /// Number of published entries.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether nothing has been published for the current input.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tvd_common::InterruptionState;

    fn done() -> HistoryEntry {
        HistoryEntry::Interruption(InterruptionState::Done { value: None, source: None })
    }

    #[test]
    fn test_publish_replaces_wholesale() {
        let store = ExecutionHistoryStore::new();
        assert!(store.is_empty());

        store.publish(vec![done()]);
        assert_eq!(store.len(), 1);

        store.publish(vec![done(), done()]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_snapshot_survives_publish() {
        let store = ExecutionHistoryStore::new();
        store.publish(vec![done()]);
        let snapshot = store.snapshot();

        store.publish(Vec::new());
        // the old snapshot is still the full old sequence
        assert_eq!(snapshot.len(), 1);
        assert!(store.is_empty());
    }
}
