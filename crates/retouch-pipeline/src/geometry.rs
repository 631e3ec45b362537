//! Lossless geometric transforms: quarter-turn rotation and mirroring.
//!
//! Only multiples of 90 degrees are supported, so no resampling is
//! involved and every pixel is copied exactly once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{ImageBuffer, map_pixels};
use crate::types::PipelineError;

/// Clockwise rotation by a quarter-turn multiple.
///
/// Serialized as the integer degree count (`90`, `180`, `270`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    /// 90 degrees clockwise. Swaps width and height.
    Quarter,
    /// 180 degrees.
    Half,
    /// 270 degrees clockwise (90 counter-clockwise). Swaps width and height.
    ThreeQuarter,
}

impl Rotation {
    /// Parse a degree count. Only 90, 180 and 270 are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidParameter`] for any other angle.
    pub fn from_degrees(degrees: i32) -> Result<Self, PipelineError> {
        match degrees {
            90 => Ok(Self::Quarter),
            180 => Ok(Self::Half),
            270 => Ok(Self::ThreeQuarter),
            other => Err(PipelineError::InvalidParameter(format!(
                "rotation must be 90, 180, or 270 degrees, got {other}"
            ))),
        }
    }

    /// Clockwise angle in degrees.
    #[must_use]
    pub const fn degrees(self) -> i32 {
        match self {
            Self::Quarter => 90,
            Self::Half => 180,
            Self::ThreeQuarter => 270,
        }
    }
}

impl TryFrom<i32> for Rotation {
    type Error = PipelineError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Mirror axis for [`flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

impl fmt::Display for FlipAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

impl FromStr for FlipAxis {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(PipelineError::InvalidParameter(format!(
                "unknown flip axis '{other}'. Expected horizontal or vertical"
            ))),
        }
    }
}

/// Rotate clockwise by `rotation`.
#[must_use = "returns the rotated image"]
pub fn rotate(image: &ImageBuffer, rotation: Rotation) -> ImageBuffer {
    match rotation {
        Rotation::Quarter => map_pixels!(image, |img| image::imageops::rotate90(img)),
        Rotation::Half => map_pixels!(image, |img| image::imageops::rotate180(img)),
        Rotation::ThreeQuarter => map_pixels!(image, |img| image::imageops::rotate270(img)),
    }
}

/// Mirror along `axis`.
#[must_use = "returns the flipped image"]
pub fn flip(image: &ImageBuffer, axis: FlipAxis) -> ImageBuffer {
    match axis {
        FlipAxis::Horizontal => map_pixels!(image, |img| image::imageops::flip_horizontal(img)),
        FlipAxis::Vertical => map_pixels!(image, |img| image::imageops::flip_vertical(img)),
    }
}
