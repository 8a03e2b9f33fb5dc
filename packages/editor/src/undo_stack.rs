//! # Undo/Redo Stack
//!
//! Tracks page history as snapshots of the block list.
//!
//! ## Design
//!
//! - Each applied change pushes the list as it was *before* the change
//! - Undo swaps the current list for the latest snapshot and keeps the
//!   current one on the redo stack
//! - New changes clear the redo stack
//! - Batches (a drag, a burst of keystrokes) collapse into one undo step
//!
//! Snapshots are cheap: a `BlockList` shares unchanged records between
//! versions.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut history = UndoStack::new();
//!
//! let next = list.remove(id).list;
//! history.push(&list, Some("Remove block"));
//!
//! let restored = history.undo(&next).unwrap();
//! assert_eq!(restored, list);
//! ```

use crate::BlockList;
use chrono::{DateTime, Utc};

/// A page state the history can return to
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub list: BlockList,

    /// Label of the change that moved away from this state
    pub description: Option<String>,

    pub at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(list: BlockList, description: Option<String>) -> Self {
        Self {
            list,
            description,
            at: Utc::now(),
        }
    }
}

/// Undo/redo stack for a page
#[derive(Debug)]
pub struct UndoStack {
    /// States to return to (most recent last)
    undo_stack: Vec<HistoryEntry>,

    /// Undone states (most recent last)
    redo_stack: Vec<HistoryEntry>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,

    /// Open batch: the state before its first change
    current_batch: Option<HistoryEntry>,
}

impl UndoStack {
    /// Create a new undo stack with default max levels (100)
    pub fn new() -> Self {
        Self::with_max_levels(100)
    }

    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_levels,
            current_batch: None,
        }
    }

    /// Record `before` as the state prior to a change. Ignored while a batch
    /// is open; the batch already holds its starting state.
    pub fn push(&mut self, before: &BlockList, description: Option<&str>) {
        if self.current_batch.is_some() {
            return;
        }
        self.push_entry(HistoryEntry::new(
            before.clone(),
            description.map(str::to_string),
        ));
    }

    /// Start grouping changes into one undo step, starting from `current`
    pub fn begin_batch(&mut self, current: &BlockList, description: impl Into<String>) {
        if self.current_batch.is_none() {
            self.current_batch = Some(HistoryEntry::new(current.clone(), Some(description.into())));
        }
    }

    /// Close the batch. Pushes one step unless nothing changed since
    /// `begin_batch`.
    pub fn end_batch(&mut self, current: &BlockList) {
        if let Some(entry) = self.current_batch.take() {
            if entry.list != *current {
                self.push_entry(entry);
            }
        }
    }

    pub fn is_batching(&self) -> bool {
        self.current_batch.is_some()
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push(entry);

        if self.max_levels > 0 && self.undo_stack.len() > self.max_levels {
            self.undo_stack.remove(0);
        }

        // New change invalidates the undone future
        self.redo_stack.clear();
    }

    /// The state to restore, or None when there is nothing to undo. An open
    /// batch is closed first, so it is undone as one step.
    pub fn undo(&mut self, current: &BlockList) -> Option<BlockList> {
        self.end_batch(current);
        let entry = self.undo_stack.pop()?;

        self.redo_stack
            .push(HistoryEntry::new(current.clone(), entry.description.clone()));
        Some(entry.list)
    }

    /// The state to restore, or None when there is nothing to redo
    pub fn redo(&mut self, current: &BlockList) -> Option<BlockList> {
        self.end_batch(current);
        let entry = self.redo_stack.pop()?;

        self.undo_stack
            .push(HistoryEntry::new(current.clone(), entry.description.clone()));
        Some(entry.list)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
    }

    /// Description of the next undo operation
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }

    /// Description of the next redo operation
    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack
            .last()
            .and_then(|entry| entry.description.as_deref())
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_blocks::{Registry, SequentialIds};

    fn add(list: &BlockList, ids: &mut SequentialIds, tag: &str) -> BlockList {
        list.add(Registry::global(), ids, tag).unwrap().0
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_undo_and_redo() {
        let mut ids = SequentialIds::new("b");
        let mut stack = UndoStack::new();

        let empty = BlockList::new();
        let one = add(&empty, &mut ids, "hero");
        stack.push(&empty, Some("Add hero"));

        assert_eq!(stack.undo_description(), Some("Add hero"));

        let undone = stack.undo(&one).unwrap();
        assert_eq!(undone, empty);
        assert_eq!(stack.redo_description(), Some("Add hero"));

        let redone = stack.redo(&undone).unwrap();
        assert_eq!(redone, one);
        assert!(stack.can_undo());
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_nothing_to_undo() {
        let mut stack = UndoStack::new();
        assert!(stack.undo(&BlockList::new()).is_none());
        assert!(stack.redo(&BlockList::new()).is_none());
    }

    #[test]
    fn test_batched_changes() {
        let mut ids = SequentialIds::new("b");
        let mut stack = UndoStack::new();

        let start = BlockList::new();
        stack.begin_batch(&start, "Add two blocks");

        let one = add(&start, &mut ids, "hero");
        stack.push(&start, None);
        let two = add(&one, &mut ids, "text");
        stack.push(&one, None);

        stack.end_batch(&two);

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo(&two).unwrap(), start);
    }

    #[test]
    fn test_undo_closes_open_batch() {
        let mut ids = SequentialIds::new("b");
        let mut stack = UndoStack::new();

        let empty = BlockList::new();
        let one = add(&empty, &mut ids, "hero");
        stack.push(&empty, Some("Add hero"));

        stack.begin_batch(&one, "Add two blocks");
        let two = add(&one, &mut ids, "text");
        stack.push(&one, None);
        let three = add(&two, &mut ids, "faq");
        stack.push(&two, None);

        assert_eq!(stack.undo(&three).unwrap(), one);
        assert!(!stack.is_batching());
        assert_eq!(stack.undo_description(), Some("Add hero"));
        assert_eq!(stack.undo(&one).unwrap(), empty);
        assert_eq!(stack.redo_description(), Some("Add hero"));
    }

    #[test]
    fn test_empty_batch_is_dropped() {
        let mut stack = UndoStack::new();
        let list = BlockList::new();

        stack.begin_batch(&list, "Nothing");
        stack.end_batch(&list);

        assert!(!stack.can_undo());
        assert!(!stack.is_batching());
    }

    #[test]
    fn test_new_change_clears_redo() {
        let mut ids = SequentialIds::new("b");
        let mut stack = UndoStack::new();

        let empty = BlockList::new();
        let one = add(&empty, &mut ids, "hero");
        stack.push(&empty, None);

        let undone = stack.undo(&one).unwrap();
        assert!(stack.can_redo());

        stack.push(&undone, None);
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_max_levels_enforced() {
        let mut ids = SequentialIds::new("b");
        let mut stack = UndoStack::with_max_levels(3);

        let mut list = BlockList::new();
        for _ in 0..5 {
            let next = add(&list, &mut ids, "spacer");
            stack.push(&list, None);
            list = next;
        }

        assert_eq!(stack.undo_levels(), 3);
    }
}
