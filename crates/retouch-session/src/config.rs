//! Session configuration.

use retouch_io::ImageFormat;
use retouch_io::codec::DEFAULT_JPEG_QUALITY;
use retouch_pipeline::history::DEFAULT_CAPACITY;
use serde::{Deserialize, Serialize};

/// Tunables for an [`EditSession`](crate::EditSession).
///
/// Every field has a default, so any subset can be supplied as JSON:
///
/// ```rust
/// # use retouch_session::SessionConfig;
/// let config: SessionConfig = serde_json::from_str(r#"{"history_capacity": 5}"#).unwrap();
/// assert_eq!(config.history_capacity, 5);
/// assert_eq!(config, SessionConfig { history_capacity: 5, ..SessionConfig::default() });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum number of snapshots kept for undo/redo, including the
    /// loaded state. Zero falls back to the default of 20.
    pub history_capacity: usize,

    /// Format written when a save path has no extension.
    pub default_format: ImageFormat,

    /// JPEG encoding quality (1 to 100).
    pub jpeg_quality: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            default_format: ImageFormat::Png,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}
