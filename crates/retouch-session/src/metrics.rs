//! Per-session operation counters.

use serde::{Deserialize, Serialize};

/// Counts of successful operations over a session's lifetime.
///
/// Failed operations and undo/redo requests that had nothing to move to
/// are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMetrics {
    /// Successful `load` / `load_buffer` calls.
    pub images_loaded: u64,
    /// Transforms committed to history.
    pub transforms_applied: u64,
    /// Undo steps taken.
    pub undos: u64,
    /// Redo steps taken.
    pub redos: u64,
    /// Resets to the original image.
    pub resets: u64,
}
