use std::collections::VecDeque;

use crate::model::{GroupTable, Rect};

/// How many undo steps are kept; older ones are dropped first.
pub const MAX_HISTORY: usize = 50;

/// Deep copy of the undoable part of a session. Images are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub rects: Vec<Rect>,
    pub groups: GroupTable,
}

/// Linear undo/redo stacks.
///
/// Recording a new snapshot discards the redo stack, so there is never more
/// than one timeline.
#[derive(Debug)]
pub struct History {
    past: VecDeque<Snapshot>,
    future: Vec<Snapshot>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(MAX_HISTORY)
    }
}

impl History {
    pub fn with_limit(limit: usize) -> Self {
        assert!(limit > 0, "history limit must be greater than 0");
        Self {
            past: VecDeque::new(),
            future: Vec::new(),
            limit,
        }
    }

    /// Pushes the state as it was before a mutation.
    pub fn record(&mut self, before: Snapshot) {
        self.past.push_back(before);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        self.future.clear();
    }

    /// Swaps `current` for the latest recorded snapshot. `current` moves to
    /// the redo stack.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        while self.past.len() > self.limit {
            self.past.pop_front();
        }
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }
}
