//! Bounded undo/redo stacks.
//!
//! # Responsibility
//! - Hold recorded diffs and hand them back in LIFO order.
//! - Enforce the history cap and the redo-clearing rule.
//!
//! # Invariants
//! - `record` always clears the redo stack.
//! - The undo stack never exceeds `max_size`; the oldest entry is evicted.

use crate::history::diff::Diff;
use std::collections::VecDeque;

/// Default history depth, matching the configurable `undo_redo_limit`.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Two stacks of diffs with a bounded undo side.
#[derive(Debug)]
pub struct UndoRedoLog {
    undo_stack: VecDeque<Diff>,
    redo_stack: Vec<Diff>,
    max_size: usize,
}

impl UndoRedoLog {
    /// Creates a log bounded to `max_size` recorded mutations (0 disables
    /// history entirely).
    pub fn new(max_size: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_size,
        }
    }

    /// Records a committed mutation; clears redo and evicts the oldest diff
    /// past the cap.
    pub fn record(&mut self, diff: Diff) {
        self.redo_stack.clear();
        if self.max_size == 0 {
            return;
        }
        self.undo_stack.push_back(diff);
        while self.undo_stack.len() > self.max_size {
            self.undo_stack.pop_front();
        }
    }

    /// Pops the newest undoable diff, if any.
    pub fn take_undo(&mut self) -> Option<Diff> {
        self.undo_stack.pop_back()
    }

    /// Pops the newest redoable diff, if any.
    pub fn take_redo(&mut self) -> Option<Diff> {
        self.redo_stack.pop()
    }

    /// Pushes a diff onto the redo side after a successful undo.
    pub fn push_redo(&mut self, diff: Diff) {
        self.redo_stack.push(diff);
    }

    /// Pushes a diff back onto the undo side after a successful redo.
    pub fn push_undo(&mut self, diff: Diff) {
        self.undo_stack.push_back(diff);
        while self.undo_stack.len() > self.max_size.max(1) {
            self.undo_stack.pop_front();
        }
    }

    /// Whether an undo target exists.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether a redo target exists.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of recorded undoable mutations.
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }
}

impl Default for UndoRedoLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::UndoRedoLog;
    use crate::history::diff::Diff;
    use crate::model::node::Node;

    fn sample_diff(rank: u32) -> Diff {
        Diff::Created {
            parent: None,
            rank,
            node: Node::new("Project", format!("n{rank}")),
        }
    }

    #[test]
    fn record_clears_redo_and_caps_history() {
        let mut log = UndoRedoLog::new(2);
        log.record(sample_diff(1));
        log.record(sample_diff(2));

        let undone = log.take_undo().unwrap();
        log.push_redo(undone);
        assert!(log.can_redo());

        log.record(sample_diff(3));
        assert!(!log.can_redo());
        assert_eq!(log.undo_len(), 2);

        log.record(sample_diff(4));
        assert_eq!(log.undo_len(), 2);
        // Oldest entry was evicted; the newest two remain, newest first out.
        assert!(matches!(log.take_undo(), Some(Diff::Created { rank: 4, .. })));
        assert!(matches!(log.take_undo(), Some(Diff::Created { rank: 3, .. })));
    }

    #[test]
    fn zero_cap_disables_history() {
        let mut log = UndoRedoLog::new(0);
        log.record(sample_diff(1));
        assert!(!log.can_undo());
    }
}
