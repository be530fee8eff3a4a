//! Snapshot history for undo/redo.

use std::sync::Arc;

/// An immutable serialized snapshot of the whole document.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    label: String,
    snapshot: Arc<str>,
}

impl HistoryEntry {
    /// The action that produced this state.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Serialized document JSON.
    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }
}

/// A sequence of document snapshots with a cursor at the current state.
///
/// Entry 0 is the state the editor started from. Undo and redo only move
/// the cursor; committing while the cursor is behind the newest entry
/// discards the entries ahead of it.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    max_entries: usize,
}

impl History {
    /// Create a history whose first entry is `initial`.
    pub fn new(initial: String, max_entries: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: "Open".to_string(),
                snapshot: initial.into(),
            }],
            cursor: 0,
            max_entries: max_entries.max(1),
        }
    }

    /// Append a snapshot as the new current state.
    pub fn commit(&mut self, label: impl Into<String>, snapshot: String) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            label: label.into(),
            snapshot: snapshot.into(),
        });
        if self.entries.len() > self.max_entries {
            let overflow = self.entries.len() - self.max_entries;
            self.entries.drain(..overflow);
        }
        self.cursor = self.entries.len() - 1;
    }

    /// The entry [`History::undo`] would step back to, without moving.
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// The entry [`History::redo`] would step forward to, without moving.
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.entries.get(self.cursor + 1)
    }

    /// Step back. Returns the entry to restore, or `None` at the oldest state.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward. Returns the entry to restore, or `None` at the newest state.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// The entry matching the current document state.
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels of all entries, oldest first.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(HistoryEntry::label).collect()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}
