//! Snapshot-based undo/redo history.
//!
//! Every entry is a complete, independently restorable copy of the board and
//! its groups. Snapshots share unchanged objects with the live document
//! through `Arc`, so committing is cheap even though entries are whole states.

use crate::board::BoardData;
use crate::group::ObjectGroup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for history entries.
pub type HistoryId = Uuid;

/// Description of the first entry of a fresh history.
pub const INITIAL_DESCRIPTION: &str = "Initial state";

/// One restorable document state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub board: Arc<BoardData>,
    pub groups: Arc<Vec<ObjectGroup>>,
    pub description: String,
}

impl HistoryEntry {
    fn new(board: Arc<BoardData>, groups: Arc<Vec<ObjectGroup>>, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            board,
            groups,
            description,
        }
    }

    /// Whether this entry holds the same document as `board` and `groups`.
    fn matches(&self, board: &Arc<BoardData>, groups: &Arc<Vec<ObjectGroup>>) -> bool {
        (Arc::ptr_eq(&self.board, board) || *self.board == **board)
            && (Arc::ptr_eq(&self.groups, groups) || *self.groups == **groups)
    }
}

/// Bounded list of snapshots with a cursor.
///
/// Entries after the cursor form the redo branch, which the next commit discards.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<Arc<HistoryEntry>>,
    index: usize,
    max_len: usize,
}

impl History {
    /// Start a history whose only entry is the given document.
    pub fn new(board: Arc<BoardData>, groups: Arc<Vec<ObjectGroup>>, max_len: usize) -> Self {
        Self {
            entries: vec![Arc::new(HistoryEntry::new(
                board,
                groups,
                INITIAL_DESCRIPTION.to_string(),
            ))],
            index: 0,
            max_len: max_len.max(1),
        }
    }

    pub fn entries(&self) -> &[Arc<HistoryEntry>] {
        &self.entries
    }

    /// Position of the entry matching the live document.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Record the given document as a new entry.
    ///
    /// Does nothing if it equals the entry at the cursor. Otherwise the redo
    /// branch is discarded, and the oldest entries are evicted once the
    /// history grows past its maximum length. Returns whether an entry was added.
    pub fn commit(
        &mut self,
        board: &Arc<BoardData>,
        groups: &Arc<Vec<ObjectGroup>>,
        description: impl Into<String>,
    ) -> bool {
        if self.current().matches(board, groups) {
            return false;
        }

        let description = description.into();
        self.entries.truncate(self.index + 1);
        self.entries.push(Arc::new(HistoryEntry::new(
            Arc::clone(board),
            Arc::clone(groups),
            description.clone(),
        )));
        self.index = self.entries.len() - 1;

        if self.entries.len() > self.max_len {
            let evicted = self.entries.len() - self.max_len;
            self.entries.drain(..evicted);
            self.index = self.index.saturating_sub(evicted);
            log::debug!("History full, evicted {} oldest entries", evicted);
        }

        log::debug!(
            "Committed '{}' ({}/{})",
            description,
            self.index + 1,
            self.entries.len()
        );
        true
    }

    /// Step back one entry. Returns the entry to restore.
    pub fn undo(&mut self) -> Option<Arc<HistoryEntry>> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(Arc::clone(&self.entries[self.index]))
    }

    /// Step forward one entry. Returns the entry to restore.
    pub fn redo(&mut self) -> Option<Arc<HistoryEntry>> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(Arc::clone(&self.entries[self.index]))
    }

    /// Seek to any entry. Out-of-range or current indices are ignored.
    pub fn jump_to(&mut self, index: usize) -> Option<Arc<HistoryEntry>> {
        if index >= self.entries.len() || index == self.index {
            return None;
        }
        self.index = index;
        Some(Arc::clone(&self.entries[index]))
    }

    /// Collapse the history to a single entry holding the given document.
    pub fn clear(
        &mut self,
        board: Arc<BoardData>,
        groups: Arc<Vec<ObjectGroup>>,
        description: impl Into<String>,
    ) {
        self.entries = vec![Arc::new(HistoryEntry::new(board, groups, description.into()))];
        self.index = 0;
    }
}
