//! Resampling to an explicit target size.
//!
//! Target dimensions are validated before any pixel work, so an invalid
//! request fails without allocating.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::{ImageBuffer, map_pixels};
use crate::types::PipelineError;

/// Largest accepted target width or height.
pub const MAX_DIMENSION: i32 = 10_000;

/// Resampling filter used by [`resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    /// Nearest-neighbor: fastest, blocky artifacts.
    Nearest,
    /// Bilinear interpolation.
    #[default]
    Linear,
}

impl ResizeFilter {
    const fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            Self::Nearest => image::imageops::FilterType::Nearest,
            Self::Linear => image::imageops::FilterType::Triangle,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nearest => f.write_str("nearest"),
            Self::Linear => f.write_str("linear"),
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" | "bilinear" => Ok(Self::Linear),
            other => Err(PipelineError::InvalidParameter(format!(
                "unknown resize filter '{other}'. Expected nearest or linear"
            ))),
        }
    }
}

/// Check a requested target size.
///
/// Returns the dimensions as unsigned values when both are in
/// `1..=MAX_DIMENSION`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidParameter`] naming the offending
/// dimension otherwise.
pub fn validate_dimensions(width: i32, height: i32) -> Result<(u32, u32), PipelineError> {
    let check = |name: &str, value: i32| {
        u32::try_from(value)
            .ok()
            .filter(|v| (1..=MAX_DIMENSION.unsigned_abs()).contains(v))
            .ok_or_else(|| dimension_out_of_range(name, value))
    };
    Ok((check("width", width)?, check("height", height)?))
}

fn dimension_out_of_range(name: &str, value: i32) -> PipelineError {
    PipelineError::InvalidParameter(format!(
        "{name} must be between 1 and {MAX_DIMENSION}, got {value}"
    ))
}

/// Resample to exactly `width` x `height`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidParameter`] if either dimension is
/// non-positive or above [`MAX_DIMENSION`].
pub fn resize(
    image: &ImageBuffer,
    width: i32,
    height: i32,
    filter: ResizeFilter,
) -> Result<ImageBuffer, PipelineError> {
    let (width, height) = validate_dimensions(width, height)?;
    if (width, height) == (image.width(), image.height()) {
        return Ok(image.clone());
    }
    let filter = filter.to_image_filter();
    Ok(map_pixels!(image, |img| image::imageops::resize(
        img, width, height, filter
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_image(w: u32, h: u32) -> ImageBuffer {
        ImageBuffer::from_pixel(w, h, &[128, 128, 128, 255]).unwrap()
    }

    #[test]
    fn default_filter_is_linear() {
        assert_eq!(ResizeFilter::default(), ResizeFilter::Linear);
    }

    #[test]
    fn validate_accepts_bounds() {
        assert_eq!(validate_dimensions(1, 1).unwrap(), (1, 1));
        assert_eq!(
            validate_dimensions(MAX_DIMENSION, MAX_DIMENSION).unwrap(),
            (10_000, 10_000)
        );
    }

    #[test]
    fn validate_rejects_non_positive() {
        assert!(validate_dimensions(0, 10).is_err());
        assert!(validate_dimensions(-5, 10).is_err());
        assert!(validate_dimensions(10, -1).is_err());
    }

    #[test]
    fn validate_rejects_over_limit() {
        let err = validate_dimensions(10_001, 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid transform parameter: width must be between 1 and 10000, got 10001",
        );
    }

    #[test]
    fn resize_hits_exact_target() {
        let out = resize(&test_image(100, 80), 33, 47, ResizeFilter::Linear).unwrap();
        assert_eq!((out.width(), out.height()), (33, 47));
        assert_eq!(out.channels(), crate::types::Channels::Rgba);
    }

    #[test]
    fn upscale_nearest_duplicates_pixels() {
        let img = ImageBuffer::from_raw(2, 1, 1, vec![10, 200]).unwrap();
        let out = resize(&img, 4, 1, ResizeFilter::Nearest).unwrap();
        assert_eq!(out.as_raw(), &[10, 10, 200, 200]);
    }

    #[test]
    fn same_size_returns_copy() {
        let img = test_image(12, 9);
        assert_eq!(resize(&img, 12, 9, ResizeFilter::Linear).unwrap(), img);
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let out = resize(&test_image(64, 64), 20, 30, ResizeFilter::Linear).unwrap();
        for px in out.as_raw().chunks_exact(4) {
            for (&got, exp) in px.iter().zip([128u8, 128, 128, 255]) {
                assert!(got.abs_diff(exp) <= 1, "expected ~{exp}, got {got}");
            }
        }
    }

    #[test]
    fn filter_parses() {
        assert_eq!("nearest".parse::<ResizeFilter>().unwrap(), ResizeFilter::Nearest);
        assert_eq!("Linear".parse::<ResizeFilter>().unwrap(), ResizeFilter::Linear);
        assert!("lanczos".parse::<ResizeFilter>().is_err());
    }
}
