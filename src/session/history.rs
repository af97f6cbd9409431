// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Undo/redo history of document snapshots.

use crate::models::Document;

/// Keep the last 50 states.
const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone)]
pub struct History {
    /// Undo stack (past states)
    undo_stack: Vec<Document>,
    /// Redo stack (future states after undo)
    redo_stack: Vec<Document>,
    max_size: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    /// Save the current state before making a change
    pub fn push(&mut self, snapshot: Document) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
        }
        // A new edit invalidates the redo branch
        self.redo_stack.clear();
    }

    /// Restore the previous state, stashing `current` for redo.
    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let previous = self.undo_stack.pop()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    /// Restore the next state, stashing `current` for undo.
    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
