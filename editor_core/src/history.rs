//! Undo/redo history as a stack of inverse edits.

use crate::cursor::Selection;
use std::time::{Duration, Instant};

/// Time window in which consecutive keystrokes share one undo step.
const COALESCE_WINDOW_MS: u64 = 300;

/// Default number of undo steps kept.
const DEFAULT_CAPACITY: usize = 1000;

/// A single reversible change to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
}

impl EditOperation {
    /// Returns the operation that undoes this one.
    pub fn inverse(&self) -> EditOperation {
        match self {
            EditOperation::Insert { position, text } => EditOperation::Delete {
                position: *position,
                text: text.clone(),
            },
            EditOperation::Delete { position, text } => EditOperation::Insert {
                position: *position,
                text: text.clone(),
            },
        }
    }

    fn is_single_char(&self) -> bool {
        let text = match self {
            EditOperation::Insert { text, .. } | EditOperation::Delete { text, .. } => text,
        };
        text.chars().count() == 1
    }
}

/// Operations undone and redone as one step.
#[derive(Debug, Clone)]
struct EditGroup {
    operations: Vec<EditOperation>,
    selection_before: Selection,
    selection_after: Selection,
    last_edit: Instant,
    /// Whether later keystrokes may still join this step.
    open: bool,
}

impl EditGroup {
    fn new(operations: Vec<EditOperation>, before: Selection, after: Selection, open: bool) -> Self {
        Self {
            operations,
            selection_before: before,
            selection_after: after,
            last_edit: Instant::now(),
            open,
        }
    }

    /// Typing and backspacing runs extend the previous step; a newline
    /// always closes it.
    fn accepts(&self, op: &EditOperation, window: Duration) -> bool {
        if !self.open || self.last_edit.elapsed() > window || !op.is_single_char() {
            return false;
        }
        let Some(last) = self.operations.last() else {
            return false;
        };
        if !last.is_single_char() {
            return false;
        }
        match (last, op) {
            (
                EditOperation::Insert {
                    position: prev,
                    text: prev_text,
                },
                EditOperation::Insert { position, text },
            ) => *position == prev + 1 && prev_text.as_str() != "\n" && text.as_str() != "\n",
            (EditOperation::Delete { position: prev, .. }, EditOperation::Delete { position, .. }) => {
                *position + 1 == *prev || position == prev
            }
            _ => false,
        }
    }
}

/// Undo and redo stacks for one buffer.
#[derive(Debug)]
pub struct History {
    undo_stack: Vec<EditGroup>,
    redo_stack: Vec<EditGroup>,
    capacity: usize,
    coalesce_window: Duration,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            capacity: capacity.max(1),
            coalesce_window: Duration::from_millis(COALESCE_WINDOW_MS),
        }
    }

    /// Sets the coalesce window. A zero window disables coalescing.
    pub fn set_coalesce_window(&mut self, window: Duration) {
        self.coalesce_window = window;
    }

    /// Records one applied edit and the caret selections around it.
    ///
    /// Any redoable steps are discarded.
    pub fn record(&mut self, op: EditOperation, before: Selection, after: Selection) {
        self.redo_stack.clear();

        let window = self.coalesce_window;
        if let Some(group) = self
            .undo_stack
            .last_mut()
            .filter(|group| !window.is_zero() && group.accepts(&op, window))
        {
            group.operations.push(op);
            group.selection_after = after;
            group.last_edit = Instant::now();
            return;
        }

        self.push(EditGroup::new(vec![op], before, after, true));
    }

    /// Records a group of operations applied together as a single step.
    pub fn record_group(&mut self, ops: Vec<EditOperation>, before: Selection, after: Selection) {
        if ops.is_empty() {
            return;
        }
        self.redo_stack.clear();
        self.push(EditGroup::new(ops, before, after, false));
    }

    fn push(&mut self, group: EditGroup) {
        self.undo_stack.push(group);
        if self.undo_stack.len() > self.capacity {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Pops the latest step. Returns the inverse operations, in the order
    /// they must be applied, and the selection to restore.
    pub fn undo(&mut self) -> Option<(Vec<EditOperation>, Selection)> {
        let group = self.undo_stack.pop()?;
        let ops = group.operations.iter().rev().map(EditOperation::inverse).collect();
        let selection = group.selection_before;
        self.redo_stack.push(group);
        Some((ops, selection))
    }

    /// Re-applies the latest undone step.
    pub fn redo(&mut self) -> Option<(Vec<EditOperation>, Selection)> {
        let mut group = self.redo_stack.pop()?;
        let ops = group.operations.clone();
        let selection = group.selection_after;
        group.open = false;
        self.undo_stack.push(group);
        Some((ops, selection))
    }

    /// Drops all history.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(position: usize, text: &str) -> EditOperation {
        EditOperation::Insert {
            position,
            text: text.to_string(),
        }
    }

    fn typed(history: &mut History, position: usize, text: &str) {
        let len = text.chars().count();
        history.record(
            insert(position, text),
            Selection::new(position),
            Selection::new(position + len),
        );
    }

    #[test]
    fn test_undo_redo() {
        let mut history = History::new(100);
        typed(&mut history, 0, "hello");

        let (ops, selection) = history.undo().unwrap();
        assert_eq!(
            ops,
            vec![EditOperation::Delete {
                position: 0,
                text: "hello".to_string()
            }]
        );
        assert_eq!(selection, Selection::new(0));
        assert!(!history.can_undo());
        assert!(history.can_redo());

        let (ops, selection) = history.redo().unwrap();
        assert_eq!(ops, vec![insert(0, "hello")]);
        assert_eq!(selection, Selection::new(5));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_redo_cleared_on_new_edit() {
        let mut history = History::new(100);
        typed(&mut history, 0, "a");
        history.undo();
        assert!(history.can_redo());

        typed(&mut history, 0, "b");
        assert!(!history.can_redo());
    }

    #[test]
    fn test_typing_run_coalesces() {
        let mut history = History::new(100);
        history.set_coalesce_window(Duration::from_secs(5));
        typed(&mut history, 0, "a");
        typed(&mut history, 1, "b");
        typed(&mut history, 2, "c");

        assert_eq!(history.undo_stack.len(), 1);
        let (ops, selection) = history.undo().unwrap();
        assert_eq!(ops.len(), 3);
        assert_eq!(selection, Selection::new(0));
    }

    #[test]
    fn test_newline_breaks_coalescing() {
        let mut history = History::new(100);
        history.set_coalesce_window(Duration::from_secs(5));
        typed(&mut history, 0, "a");
        typed(&mut history, 1, "\n");
        typed(&mut history, 2, "b");

        assert_eq!(history.undo_stack.len(), 3);
    }

    #[test]
    fn test_zero_window_disables_coalescing() {
        let mut history = History::new(100);
        history.set_coalesce_window(Duration::ZERO);
        typed(&mut history, 0, "a");
        typed(&mut history, 1, "b");

        assert_eq!(history.undo_stack.len(), 2);
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = History::new(2);
        history.set_coalesce_window(Duration::ZERO);
        typed(&mut history, 0, "a");
        typed(&mut history, 1, "b");
        typed(&mut history, 2, "c");

        assert_eq!(history.undo_stack.len(), 2);
        let (ops, _) = history.undo().unwrap();
        assert_eq!(
            ops,
            vec![EditOperation::Delete {
                position: 2,
                text: "c".to_string()
            }]
        );
    }

    #[test]
    fn test_group_is_one_step() {
        let mut history = History::new(100);
        history.record_group(
            vec![
                EditOperation::Delete {
                    position: 0,
                    text: "old".to_string(),
                },
                insert(0, "n"),
            ],
            Selection::new(0),
            Selection::new(1),
        );
        typed(&mut history, 1, "e");

        assert_eq!(history.undo_stack.len(), 2);
        history.undo();
        let (ops, _) = history.undo().unwrap();
        assert_eq!(
            ops,
            vec![
                EditOperation::Delete {
                    position: 0,
                    text: "n".to_string()
                },
                insert(0, "old"),
            ]
        );
    }
}
