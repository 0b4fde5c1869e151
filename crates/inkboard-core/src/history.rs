//! Bounded undo/redo history of shape-list snapshots.

use crate::shapes::Shape;
use std::collections::VecDeque;
use std::sync::Arc;

/// Maximum number of undo states to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// A full copy of the committed shape list.
///
/// Shared with `DocumentState::shapes`, so recording one is a reference-count
/// bump rather than a deep copy.
pub type Snapshot = Arc<Vec<Shape>>;

/// Undo and redo stacks, each capped at `capacity` with the oldest evicted first.
#[derive(Debug, Clone)]
pub struct History {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a snapshot onto the undo stack, evicting the oldest past capacity.
    pub fn push(&mut self, snapshot: Snapshot) {
        push_bounded(&mut self.undo_stack, snapshot, self.capacity);
    }

    /// Record the pre-edit state of a brand-new edit.
    ///
    /// Redo is only valid right after an undo, so it is cleared here.
    pub fn record(&mut self, snapshot: Snapshot) {
        self.push(snapshot);
        self.redo_stack.clear();
    }

    /// Step back: returns the snapshot to adopt, stashing `current` for redo.
    pub fn undo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, current, self.capacity);
        Some(snapshot)
    }

    /// Step forward: returns the snapshot to adopt, stashing `current` for undo.
    pub fn redo(&mut self, current: Snapshot) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, current, self.capacity);
        Some(snapshot)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, capacity: usize) {
    if stack.len() >= capacity {
        stack.pop_front();
    }
    stack.push_back(snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ArgbColor, Geometric};
    use crate::tools::Tool;
    use kurbo::Point;
    use uuid::Uuid;

    fn snapshot_with(n: usize) -> Snapshot {
        let shapes = (0..n)
            .map(|i| {
                Shape::Geometric(Geometric::new(
                    Uuid::new_v4(),
                    ArgbColor::BLACK,
                    1.0,
                    Tool::LinePlain,
                    Point::new(i as f64, 0.0),
                    Point::new(i as f64, 10.0),
                ))
            })
            .collect();
        Arc::new(shapes)
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(history.undo(snapshot_with(0)).is_none());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_undo_then_redo() {
        let mut history = History::new();
        let before = snapshot_with(0);
        let after = snapshot_with(1);

        history.record(Arc::clone(&before));
        let restored = history.undo(Arc::clone(&after)).unwrap();
        assert!(Arc::ptr_eq(&restored, &before));
        assert!(history.can_redo());

        let replayed = history.redo(restored).unwrap();
        assert!(Arc::ptr_eq(&replayed, &after));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut history = History::new();
        history.record(snapshot_with(0));
        history.undo(snapshot_with(1));
        assert!(history.can_redo());

        history.record(snapshot_with(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = History::new();
        let oldest = snapshot_with(0);
        history.push(Arc::clone(&oldest));
        for i in 1..MAX_UNDO_HISTORY {
            history.push(snapshot_with(i));
        }
        assert_eq!(history.undo_len(), MAX_UNDO_HISTORY);

        history.push(snapshot_with(1));
        assert_eq!(history.undo_len(), MAX_UNDO_HISTORY);

        // Drain: the original oldest entry must be gone.
        let mut current = snapshot_with(0);
        while let Some(snapshot) = history.undo(current) {
            assert!(!Arc::ptr_eq(&snapshot, &oldest));
            current = snapshot;
        }
    }

    #[test]
    fn test_redo_stack_is_bounded() {
        let mut history = History::with_capacity(3);
        for i in 0..3 {
            history.push(snapshot_with(i));
        }
        let mut current = snapshot_with(9);
        while let Some(snapshot) = history.undo(current) {
            current = snapshot;
        }
        assert_eq!(history.redo_len(), 3);
        assert_eq!(history.undo_len(), 0);
    }
}
