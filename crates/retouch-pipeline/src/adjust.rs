//! Brightness and contrast adjustments.
//!
//! Both are per-sample point operations, so each builds a 256-entry
//! lookup table once and maps every color sample through it. Alpha is
//! never touched.

use image::Pixel;

use crate::buffer::{ImageBuffer, map_pixels};
use crate::types::PipelineError;

/// Intensity that contrast scaling pivots around.
pub const NEUTRAL_POINT: f32 = 128.0;

/// Map every non-alpha sample through `table`.
fn map_color_samples<P>(
    image: &image::ImageBuffer<P, Vec<u8>>,
    table: &[u8; 256],
) -> image::ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let color = usize::from(if P::HAS_ALPHA {
        P::CHANNEL_COUNT - 1
    } else {
        P::CHANNEL_COUNT
    });
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for sample in pixel.channels_mut().iter_mut().take(color) {
            *sample = table[usize::from(*sample)];
        }
    }
    out
}

fn lookup_table(f: impl Fn(u8) -> u8) -> [u8; 256] {
    let mut table = [0u8; 256];
    for (value, entry) in (0..=u8::MAX).zip(table.iter_mut()) {
        *entry = f(value);
    }
    table
}

/// Add `delta` to every color sample, saturating at 0 and 255.
#[must_use = "returns the adjusted image"]
pub fn brightness(image: &ImageBuffer, delta: i32) -> ImageBuffer {
    let table = lookup_table(|v| {
        let shifted = i32::from(v).saturating_add(delta).clamp(0, 255);
        u8::try_from(shifted).unwrap_or(u8::MAX)
    });
    map_pixels!(image, |img| map_color_samples(img, &table))
}

/// Scale every color sample about [`NEUTRAL_POINT`] by `factor`.
///
/// A factor of 1.0 is the identity, 0.0 flattens to mid-gray, values
/// above 1.0 increase contrast.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidParameter`] if `factor` is negative,
/// NaN or infinite.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn contrast(image: &ImageBuffer, factor: f32) -> Result<ImageBuffer, PipelineError> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(PipelineError::InvalidParameter(format!(
            "contrast factor must be a finite non-negative number, got {factor}"
        )));
    }
    let table = lookup_table(|v| {
        (f32::from(v) - NEUTRAL_POINT)
            .mul_add(factor, NEUTRAL_POINT)
            .round()
            .clamp(0.0, 255.0) as u8
    });
    Ok(map_pixels!(image, |img| map_color_samples(img, &table)))
}
