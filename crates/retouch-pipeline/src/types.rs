//! Shared types for the retouch editing core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can build single-channel
/// buffers without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage` for three-channel buffers.
pub use image::RgbImage;

/// Re-export `RgbaImage` for four-channel buffers.
pub use image::RgbaImage;

/// Channel layout of an [`ImageBuffer`](crate::ImageBuffer).
///
/// Every channel is 8 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channels {
    /// Single intensity channel.
    Gray,
    /// Red, green, blue.
    Rgb,
    /// Red, green, blue, alpha.
    Rgba,
}

impl Channels {
    /// Number of 8-bit samples per pixel.
    #[must_use]
    pub const fn count(self) -> u8 {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Map a sample count back to a layout. Only 1, 3 and 4 are valid.
    #[must_use]
    pub const fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(Self::Gray),
            3 => Some(Self::Rgb),
            4 => Some(Self::Rgba),
            _ => None,
        }
    }

    /// Whether the last sample of each pixel is alpha.
    #[must_use]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// Image metadata for status display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Samples per pixel (1, 3 or 4).
    pub channels: u8,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}, {} channel{}",
            self.width,
            self.height,
            self.channels,
            if self.channels == 1 { "" } else { "s" },
        )
    }
}

/// Errors produced by buffer construction and transforms.
///
/// Every variant is an invalid-input condition: either the buffer is
/// malformed or a transform parameter is out of range. Nothing in this
/// crate performs I/O, so there is no I/O variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// The buffer has a zero width or height.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage {
        /// Width in pixels.
        width: u32,
        /// Height in pixels.
        height: u32,
    },

    /// Raw pixel storage does not match `width * height * channels`.
    #[error("pixel data holds {actual} bytes, expected {expected}")]
    BufferSize {
        /// Byte count implied by the dimensions.
        expected: u64,
        /// Byte count actually supplied.
        actual: u64,
    },

    /// Channel count other than 1, 3 or 4.
    #[error("unsupported channel count {0} (expected 1, 3, or 4)")]
    UnsupportedChannels(u8),

    /// A transform parameter is out of range or could not be parsed.
    #[error("invalid transform parameter: {0}")]
    InvalidParameter(String),
}
