//! Bounded undo/redo history over scene snapshots.

use serde::{Deserialize, Serialize};

use crate::{Element, ElementId};

/// Maximum number of snapshots retained before the oldest is evicted.
pub const HISTORY_CAPACITY: usize = 50;

/// An immutable copy of editor state captured for undo/redo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Deep copy of the element collection.
    pub elements: Vec<Element>,
    /// The selected element at capture time.
    pub selected: Option<ElementId>,
}

/// Linear undo/redo stack with a bounded snapshot count.
///
/// The cursor points at the snapshot representing the current state
/// (`None` before the first record). Recording while the cursor is not at
/// the tail discards everything after it; exceeding capacity evicts the
/// oldest snapshot and shifts the cursor down. Undo and redo only move the
/// cursor, never the stack.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Create an empty history with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Create an empty history with a custom capacity (tests).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Record a new snapshot as the current state.
    ///
    /// Truncates any redo tail, appends, and evicts the oldest snapshot
    /// once the capacity is exceeded.
    pub fn record(&mut self, snapshot: Snapshot) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.snapshots.truncate(keep);
        self.snapshots.push(snapshot);

        if self.snapshots.len() > self.capacity {
            self.snapshots.remove(0);
        }
        self.cursor = Some(self.snapshots.len() - 1);
    }

    /// Step the cursor back and return the snapshot to restore.
    ///
    /// No-op (returns `None`) when already at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.snapshots.get(cursor - 1)
    }

    /// Step the cursor forward and return the snapshot to restore.
    ///
    /// No-op (returns `None`) when already at the newest snapshot.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.snapshots.get(cursor + 1)
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor
            .is_some_and(|c| c + 1 < self.snapshots.len())
    }

    /// Number of snapshots currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether the history holds no snapshots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Element, ElementKind, ShapeKind, StrokeStyle};

    fn snapshot_with(count: usize) -> Snapshot {
        let elements = (0..count)
            .map(|_| {
                Element::new(ElementKind::Shape {
                    shape: ShapeKind::Rectangle,
                    fill: "#000000".to_string(),
                    stroke: None,
                    stroke_width: 0.0,
                    stroke_style: StrokeStyle::Solid,
                    border_radius: 0.0,
                    shadow: None,
                })
            })
            .collect();
        Snapshot {
            elements,
            selected: None,
        }
    }

    #[test]
    fn test_empty_history() {
        let mut history = History::new();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
    }

    #[test]
    fn test_record_caps_at_capacity() {
        let mut history = History::new();
        for i in 0..75 {
            history.record(snapshot_with(i));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Cursor must point at the most recent snapshot.
        assert!(!history.can_redo());
        assert!(history.can_undo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = History::new();
        for i in 0..10 {
            history.record(snapshot_with(i));
        }

        let mut counts = Vec::new();
        for _ in 0..5 {
            let snap = history.undo().expect("undo available");
            counts.push(snap.elements.len());
        }
        assert_eq!(counts, vec![8, 7, 6, 5, 4]);

        for expected in [5, 6, 7, 8, 9] {
            let snap = history.redo().expect("redo available");
            assert_eq!(snap.elements.len(), expected);
        }
        assert!(!history.can_redo());
    }

    #[test]
    fn test_record_truncates_redo_tail() {
        let mut history = History::new();
        for i in 0..5 {
            history.record(snapshot_with(i));
        }

        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.record(snapshot_with(42));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 4);

        let snap = history.undo().expect("undo available");
        assert_eq!(snap.elements.len(), 2);
    }

    #[test]
    fn test_undo_stops_at_oldest() {
        let mut history = History::new();
        history.record(snapshot_with(0));
        history.record(snapshot_with(1));

        assert!(history.undo().is_some());
        assert!(history.undo().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_eviction_shifts_cursor() {
        let mut history = History::with_capacity(3);
        for i in 0..5 {
            history.record(snapshot_with(i));
        }
        assert_eq!(history.len(), 3);

        // Oldest reachable state is now snapshot 2.
        let mut last = 0;
        while let Some(snap) = history.undo() {
            last = snap.elements.len();
        }
        assert_eq!(last, 2);
    }
}
