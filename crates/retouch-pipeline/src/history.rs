//! Bounded, linear undo/redo history of image snapshots.
//!
//! The store holds up to `capacity` owned [`ImageBuffer`]s and a cursor
//! pointing at the current one. Entries before the cursor are undoable,
//! entries after it are redoable. Saving while the cursor is in the past
//! discards the redoable entries, and saving past capacity evicts the
//! oldest entry.
//!
//! Every buffer crossing the store boundary is cloned on the way in and
//! on the way out, so callers can never alias a stored snapshot.

use std::collections::VecDeque;
use std::fmt;

use crate::buffer::ImageBuffer;

/// Snapshot count used when no capacity (or zero) is given.
pub const DEFAULT_CAPACITY: usize = 20;

/// Linear snapshot history with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStore {
    entries: VecDeque<ImageBuffer>,
    cursor: Option<usize>,
    capacity: usize,
}

impl HistoryStore {
    /// An empty store holding at most `capacity` snapshots.
    ///
    /// A capacity of zero falls back to [`DEFAULT_CAPACITY`].
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            entries: VecDeque::new(),
            cursor: None,
            capacity,
        }
    }

    /// Record a snapshot as the new current entry.
    ///
    /// `None` is a no-op. Otherwise every entry after the cursor is
    /// dropped, a copy of `image` is appended, and the cursor moves onto
    /// it. If that pushes the store past capacity the oldest entry is
    /// evicted.
    pub fn save<'a>(&mut self, image: impl Into<Option<&'a ImageBuffer>>) {
        let Some(image) = image.into() else {
            return;
        };

        let keep = self.cursor.map_or(0, |c| c + 1);
        let pruned = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);
        if pruned > 0 {
            tracing::trace!(pruned, "discarded redo branch");
        }

        self.entries.push_back(image.clone());
        let mut cursor = self.entries.len() - 1;

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            cursor -= 1;
            tracing::trace!(capacity = self.capacity, "evicted oldest history entry");
        }
        self.cursor = Some(cursor);
    }

    /// Step back one entry and return a copy of it.
    ///
    /// Returns `None` without moving when already at the oldest entry or
    /// when the store is empty.
    pub fn undo(&mut self) -> Option<ImageBuffer> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    /// Step forward one entry and return a copy of it.
    ///
    /// Returns `None` without moving when already at the newest entry or
    /// when the store is empty.
    pub fn redo(&mut self) -> Option<ImageBuffer> {
        let cursor = self.cursor.filter(|&c| c + 1 < self.entries.len())? + 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    /// Whether [`undo`](Self::undo) would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// Whether [`redo`](Self::redo) would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// A copy of the entry at `index` (0 is oldest).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<ImageBuffer> {
        self.entries.get(index).cloned()
    }

    /// A copy of the entry at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<ImageBuffer> {
        self.cursor.and_then(|c| self.get(c))
    }

    /// Whether any entry is pixel-for-pixel equal to `image`.
    #[must_use]
    pub fn contains(&self, image: &ImageBuffer) -> bool {
        self.entries.contains(image)
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry, or `None` when empty.
    #[must_use]
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Maximum number of stored snapshots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Display for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cursor {
            Some(cursor) => write!(
                f,
                "History: {} states, at index {cursor}",
                self.entries.len()
            ),
            None => f.write_str("History: empty"),
        }
    }
}
