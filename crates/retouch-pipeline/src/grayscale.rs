//! Grayscale conversion with channel re-expansion.
//!
//! The luminance image is expanded back to the input's channel layout so
//! downstream transforms always see a uniform channel shape. Edge
//! detection reuses the same reduce/expand pair.

use image::{GrayImage, Rgb, Rgba, RgbImage, RgbaImage};

use crate::buffer::{ImageBuffer, Pixels};

/// Luminance-weighted reduction to a single channel.
///
/// Uses the `image` crate's weighting (`0.2126*R + 0.7152*G + 0.0722*B`).
/// Alpha is ignored.
#[must_use = "returns the luminance image"]
pub fn luminance(image: &ImageBuffer) -> GrayImage {
    match image.pixels() {
        Pixels::Gray(img) => img.clone(),
        Pixels::Rgb(img) => image::imageops::grayscale(img),
        Pixels::Rgba(img) => image::imageops::grayscale(img),
    }
}

/// Expand a single-channel image to the layout of `like`.
///
/// Every color channel receives the intensity value. For RGBA, the alpha
/// channel is taken from `like`, which must have the same dimensions.
#[must_use = "returns the expanded image"]
pub fn expand_to_layout(luma: GrayImage, like: &ImageBuffer) -> ImageBuffer {
    match like.pixels() {
        Pixels::Gray(_) => ImageBuffer::from(luma),
        Pixels::Rgb(_) => ImageBuffer::from(RgbImage::from_fn(luma.width(), luma.height(), |x, y| {
            let v = luma.get_pixel(x, y).0[0];
            Rgb([v, v, v])
        })),
        Pixels::Rgba(source) => {
            ImageBuffer::from(RgbaImage::from_fn(luma.width(), luma.height(), |x, y| {
                let v = luma.get_pixel(x, y).0[0];
                Rgba([v, v, v, source.get_pixel(x, y).0[3]])
            }))
        }
    }
}

/// Convert to grayscale while keeping the channel count.
///
/// A single-channel input is returned as an unchanged copy.
#[must_use = "returns the grayscale image"]
pub fn grayscale(image: &ImageBuffer) -> ImageBuffer {
    if let Pixels::Gray(_) = image.pixels() {
        return image.clone();
    }
    expand_to_layout(luminance(image), image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Channels;

    fn rgb_pixel(r: u8, g: u8, b: u8) -> ImageBuffer {
        ImageBuffer::from_pixel(1, 1, &[r, g, b]).unwrap()
    }

    #[test]
    #[allow(clippy::cast_possible_truncation)]
    fn rgb_output_has_equal_channels() {
        let img = ImageBuffer::from(RgbImage::from_fn(10, 10, |x, y| {
            Rgb([(x * 20) as u8, (y * 20) as u8, 100])
        }));
        let gray = grayscale(&img);
        assert_eq!(gray.channels(), Channels::Rgb);
        for px in gray.as_raw().chunks_exact(3) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn dimensions_preserved() {
        let img = ImageBuffer::from_pixel(17, 31, &[128, 64, 32]).unwrap();
        let gray = grayscale(&img);
        assert_eq!(gray.width(), 17);
        assert_eq!(gray.height(), 31);
    }

    #[test]
    fn single_channel_input_is_unchanged() {
        let img = ImageBuffer::from_raw(2, 1, 1, vec![3, 250]).unwrap();
        assert_eq!(grayscale(&img), img);
    }

    #[test]
    fn rgba_keeps_alpha() {
        let img = ImageBuffer::from_pixel(3, 3, &[200, 10, 10, 77]).unwrap();
        let gray = grayscale(&img);
        assert_eq!(gray.channels(), Channels::Rgba);
        for px in gray.as_raw().chunks_exact(4) {
            assert_eq!(px[3], 77);
            assert_eq!(px[0], px[1]);
        }
    }

    #[test]
    fn weighting_favors_green() {
        // A weighted luminance conversion (not a plain average) makes
        // green brightest and blue darkest.
        let r = grayscale(&rgb_pixel(255, 0, 0)).as_raw()[0];
        let g = grayscale(&rgb_pixel(0, 255, 0)).as_raw()[0];
        let b = grayscale(&rgb_pixel(0, 0, 255)).as_raw()[0];
        assert!(
            g > r && r > b,
            "expected green > red > blue luminance, got R={r} G={g} B={b}",
        );
    }

    #[test]
    fn white_stays_white() {
        let img = ImageBuffer::from_pixel(2, 2, &[255, 255, 255]).unwrap();
        assert!(grayscale(&img).as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn expand_to_gray_layout_is_identity() {
        let luma = GrayImage::from_raw(2, 1, vec![1, 2]).unwrap();
        let like = ImageBuffer::from_pixel(2, 1, &[0]).unwrap();
        assert_eq!(expand_to_layout(luma, &like).as_raw(), &[1, 2]);
    }
}
