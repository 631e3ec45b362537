//! retouch-pipeline: Pure image editing core (sans-IO).
//!
//! Holds the pieces of the editor that never touch a file or a terminal:
//!
//! - [`ImageBuffer`]: an owned, immutable 8-bit gray/RGB/RGBA pixel grid.
//! - [`Transform`]: the closed set of edits (grayscale, blur, edge
//!   detection, brightness, contrast, rotate, flip, resize) plus
//!   [`FilterChain`] for running several as one.
//! - [`HistoryStore`]: the bounded linear undo/redo stack of snapshots.
//!
//! Decoding and encoding live in `retouch-io`; the stateful editing
//! session that ties these together lives in `retouch-session`.

pub mod adjust;
pub mod blur;
mod buffer;
pub mod chain;
pub mod edge;
pub mod geometry;
pub mod grayscale;
pub mod history;
pub mod resize;
pub mod transform;
pub mod types;

pub use buffer::ImageBuffer;
pub use chain::FilterChain;
pub use geometry::{FlipAxis, Rotation};
pub use history::HistoryStore;
pub use resize::ResizeFilter;
pub use transform::Transform;
pub use types::{Channels, ImageInfo, PipelineError};
