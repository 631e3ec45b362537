//! Canny edge detection rendered dark-on-light.
//!
//! Wraps [`imageproc::edges::canny`] on the luminance image, inverts the
//! binary edge map so edges are black on white, and expands the result
//! back to the input's channel layout.

use image::GrayImage;

use crate::buffer::ImageBuffer;
use crate::grayscale;
use crate::types::PipelineError;

/// Minimum allowed Canny threshold.
///
/// A low threshold of zero marks every pixel with any gradient as a
/// potential edge, producing an edge map that is mostly noise.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Default hysteresis low threshold.
pub const DEFAULT_LOW_THRESHOLD: f32 = 50.0;

/// Default hysteresis high threshold.
pub const DEFAULT_HIGH_THRESHOLD: f32 = 150.0;

/// Detect edges using the Canny algorithm.
///
/// Returns a binary image: 255 for edge pixels, 0 for non-edge.
///
/// Both thresholds are clamped to a minimum of [`MIN_THRESHOLD`] and
/// `low_threshold` is clamped to be at most `high_threshold`.
#[must_use = "returns the binary edge map"]
pub fn canny(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let high = high_threshold.max(MIN_THRESHOLD);
    let low = low_threshold.max(MIN_THRESHOLD).min(high);
    imageproc::edges::canny(image, low, high)
}

/// Invert a binary edge map (bitwise NOT).
#[must_use = "returns the inverted edge map"]
pub fn invert_edge_map(edges: &GrayImage) -> GrayImage {
    GrayImage::from_fn(edges.width(), edges.height(), |x, y| {
        image::Luma([!edges.get_pixel(x, y).0[0]])
    })
}

/// Full edge-detection transform: luminance, Canny, inversion, and
/// re-expansion to the original channel count (alpha is carried through).
///
/// # Errors
///
/// Returns [`PipelineError::InvalidParameter`] if either threshold is NaN
/// or infinite.
pub fn detect_edges(
    image: &ImageBuffer,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<ImageBuffer, PipelineError> {
    if !low_threshold.is_finite() || !high_threshold.is_finite() {
        return Err(PipelineError::InvalidParameter(format!(
            "edge thresholds must be finite, got {low_threshold} and {high_threshold}"
        )));
    }
    let edges = canny(&grayscale::luminance(image), low_threshold, high_threshold);
    Ok(grayscale::expand_to_layout(invert_edge_map(&edges), image))
}
