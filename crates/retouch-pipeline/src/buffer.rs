//! Owned, immutable pixel buffers.
//!
//! An [`ImageBuffer`] is the unit of state in the editor: transforms take
//! one by reference and return a new one, and the history stores clones.
//! There is no mutable pixel access: a buffer never changes after it
//! has been produced.

use std::fmt;

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::types::{Channels, ImageInfo, PipelineError};

/// Concrete pixel storage, one variant per supported channel layout.
#[derive(Clone, PartialEq, Eq)]
pub(crate) enum Pixels {
    Gray(GrayImage),
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

/// Evaluate a pixel-type-generic expression against whichever concrete
/// image a buffer holds and wrap the result back into an [`ImageBuffer`].
///
/// The body is expanded once per layout, so it may call generic
/// `image`/`imageproc` functions that return the same pixel type.
macro_rules! map_pixels {
    ($buffer:expr, |$image:ident| $body:expr) => {
        match $buffer.pixels() {
            $crate::buffer::Pixels::Gray($image) => $crate::ImageBuffer::from($body),
            $crate::buffer::Pixels::Rgb($image) => $crate::ImageBuffer::from($body),
            $crate::buffer::Pixels::Rgba($image) => $crate::ImageBuffer::from($body),
        }
    };
}
pub(crate) use map_pixels;

/// A 2D grid of 8-bit pixels with 1, 3 or 4 channels.
///
/// Storage is contiguous, row-major, `width * height * channels` bytes.
/// Cloning is a deep copy.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pixels: Pixels,
}

impl ImageBuffer {
    /// Build a buffer from raw row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedChannels`] unless `channels` is
    /// 1, 3 or 4, and [`PipelineError::BufferSize`] if `data.len()` is not
    /// exactly `width * height * channels`.
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        data: Vec<u8>,
    ) -> Result<Self, PipelineError> {
        let layout =
            Channels::from_count(channels).ok_or(PipelineError::UnsupportedChannels(channels))?;
        let expected = u64::from(width) * u64::from(height) * u64::from(channels);
        let actual = data.len() as u64;
        if expected != actual {
            return Err(PipelineError::BufferSize { expected, actual });
        }

        let pixels = match layout {
            Channels::Gray => GrayImage::from_raw(width, height, data).map(Pixels::Gray),
            Channels::Rgb => RgbImage::from_raw(width, height, data).map(Pixels::Rgb),
            Channels::Rgba => RgbaImage::from_raw(width, height, data).map(Pixels::Rgba),
        };
        pixels
            .map(|pixels| Self { pixels })
            .ok_or(PipelineError::BufferSize { expected, actual })
    }

    /// Build a buffer with every pixel set to `pixel`.
    ///
    /// The channel count is `pixel.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::UnsupportedChannels`] if `pixel` does not
    /// have 1, 3 or 4 samples.
    pub fn from_pixel(width: u32, height: u32, pixel: &[u8]) -> Result<Self, PipelineError> {
        let channels = u8::try_from(pixel.len()).unwrap_or(u8::MAX);
        if Channels::from_count(channels).is_none() {
            return Err(PipelineError::UnsupportedChannels(channels));
        }
        let count = usize::try_from(u64::from(width) * u64::from(height)).map_err(|_| {
            PipelineError::InvalidParameter(format!("{width}x{height} does not fit in memory"))
        })?;
        Self::from_raw(width, height, channels, pixel.repeat(count))
    }

    /// Convert a decoded image into one of the three supported layouts.
    ///
    /// 8-bit gray, RGB and RGBA are taken as-is. Anything else (gray with
    /// alpha, 16-bit and float samples) is converted to RGBA if it carries
    /// alpha, RGB if it carries color, and gray otherwise.
    #[must_use]
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let pixels = match image {
            DynamicImage::ImageLuma8(img) => Pixels::Gray(img),
            DynamicImage::ImageRgb8(img) => Pixels::Rgb(img),
            DynamicImage::ImageRgba8(img) => Pixels::Rgba(img),
            other => {
                let color = other.color();
                if color.has_alpha() {
                    Pixels::Rgba(other.to_rgba8())
                } else if color.has_color() {
                    Pixels::Rgb(other.to_rgb8())
                } else {
                    Pixels::Gray(other.to_luma8())
                }
            }
        };
        Self { pixels }
    }

    /// Copy into a [`DynamicImage`] for encoding.
    #[must_use]
    pub fn to_dynamic(&self) -> DynamicImage {
        match &self.pixels {
            Pixels::Gray(img) => DynamicImage::ImageLuma8(img.clone()),
            Pixels::Rgb(img) => DynamicImage::ImageRgb8(img.clone()),
            Pixels::Rgba(img) => DynamicImage::ImageRgba8(img.clone()),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        match &self.pixels {
            Pixels::Gray(img) => img.width(),
            Pixels::Rgb(img) => img.width(),
            Pixels::Rgba(img) => img.width(),
        }
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        match &self.pixels {
            Pixels::Gray(img) => img.height(),
            Pixels::Rgb(img) => img.height(),
            Pixels::Rgba(img) => img.height(),
        }
    }

    /// Channel layout.
    #[must_use]
    pub const fn channels(&self) -> Channels {
        match &self.pixels {
            Pixels::Gray(_) => Channels::Gray,
            Pixels::Rgb(_) => Channels::Rgb,
            Pixels::Rgba(_) => Channels::Rgba,
        }
    }

    /// Dimensions and channel count.
    #[must_use]
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width(),
            height: self.height(),
            channels: self.channels().count(),
        }
    }

    /// Returns `true` if the buffer has a zero width or height.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Raw row-major samples.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        match &self.pixels {
            Pixels::Gray(img) => img.as_raw(),
            Pixels::Rgb(img) => img.as_raw(),
            Pixels::Rgba(img) => img.as_raw(),
        }
    }

    /// Consume the buffer and return its samples.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        match self.pixels {
            Pixels::Gray(img) => img.into_raw(),
            Pixels::Rgb(img) => img.into_raw(),
            Pixels::Rgba(img) => img.into_raw(),
        }
    }

    /// Samples of the pixel at `(x, y)`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let stride = usize::from(self.channels().count());
        let index = (u64::from(y) * u64::from(self.width()) + u64::from(x)) as usize * stride;
        self.as_raw().get(index..index + stride)
    }

    /// Check that the buffer can be transformed.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyImage`] for a zero width or height.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.is_empty() {
            return Err(PipelineError::EmptyImage {
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }

    pub(crate) const fn pixels(&self) -> &Pixels {
        &self.pixels
    }
}

impl From<GrayImage> for ImageBuffer {
    fn from(image: GrayImage) -> Self {
        Self {
            pixels: Pixels::Gray(image),
        }
    }
}

impl From<RgbImage> for ImageBuffer {
    fn from(image: RgbImage) -> Self {
        Self {
            pixels: Pixels::Rgb(image),
        }
    }
}

impl From<RgbaImage> for ImageBuffer {
    fn from(image: RgbaImage) -> Self {
        Self {
            pixels: Pixels::Rgba(image),
        }
    }
}

// Pixel data is omitted: a 1000x1000 buffer would print megabytes.
impl fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("channels", &self.channels())
            .finish_non_exhaustive()
    }
}
