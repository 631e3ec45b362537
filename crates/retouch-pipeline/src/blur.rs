//! Gaussian blur with an odd, bounded kernel size.
//!
//! The requested radius is normalized to an odd kernel size in
//! `1..=MAX_KERNEL_SIZE`, and the sigma is derived from that size with
//! the usual `0.3 * ((k - 1) / 2 - 1) + 0.8` rule. The kernel is applied
//! separably (rows then columns) to every channel via
//! [`imageproc::filter::separable_filter_equal`].

use crate::buffer::{ImageBuffer, map_pixels};

/// Largest kernel size a blur will use.
pub const MAX_KERNEL_SIZE: u32 = 99;
const _: () = assert!(MAX_KERNEL_SIZE % 2 == 1);

/// Normalize a blur radius to an odd kernel size in `1..=MAX_KERNEL_SIZE`.
///
/// Even values round up to the next odd value.
#[must_use]
pub const fn kernel_size(radius: u32) -> u32 {
    let odd = if radius % 2 == 0 {
        radius.saturating_add(1)
    } else {
        radius
    };
    if odd > MAX_KERNEL_SIZE {
        MAX_KERNEL_SIZE
    } else {
        odd
    }
}

/// Gaussian sigma for a kernel of `size` taps.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3f32.mul_add((size as f32 - 1.0).mul_add(0.5, -1.0), 0.8)
}

/// Normalized 1D Gaussian weights for a kernel of `size` taps.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    let sigma = sigma_for_kernel(size);
    let center = (size / 2) as f32;
    let denom = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Blur every channel with a Gaussian kernel sized from `radius`.
///
/// A radius that normalizes to a single tap (0 or 1) returns a copy.
#[must_use = "returns the blurred image"]
pub fn gaussian_blur(image: &ImageBuffer, radius: u32) -> ImageBuffer {
    let size = kernel_size(radius);
    if size == 1 {
        return image.clone();
    }
    let kernel = gaussian_kernel(size);
    map_pixels!(image, |img| imageproc::filter::separable_filter_equal(
        img, &kernel
    ))
}
