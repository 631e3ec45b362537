//! Reading and writing image files.
//!
//! The [`Codec`] trait is the seam between an editing session and the
//! filesystem. [`FileCodec`] implements it with the `image` crate for
//! the formats listed in [`ImageFormat`].

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use retouch_pipeline::{ImageBuffer, PipelineError};

use crate::format::ImageFormat;

/// JPEG quality used when none is configured.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Errors from decoding or encoding an image file.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The path's extension is not a supported format.
    #[error("unsupported image format: {}", path.display())]
    UnsupportedFormat {
        /// Offending path.
        path: PathBuf,
    },

    /// The file could not be opened or decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: image::ImageError,
    },

    /// The file could not be created or encoded.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        /// File being written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: image::ImageError,
    },

    /// The decoded image, or the image to encode, has no pixels.
    #[error(transparent)]
    InvalidImage(#[from] PipelineError),
}

/// Decode and encode [`ImageBuffer`]s at filesystem paths.
pub trait Codec {
    /// Read the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] if the extension is not
    /// recognized, [`CodecError::Decode`] if the file is missing or
    /// corrupt, and [`CodecError::InvalidImage`] if it has no pixels.
    fn decode(&self, path: &Path) -> Result<ImageBuffer, CodecError>;

    /// Write `image` to `path` and return the path actually written.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] if the extension is not
    /// recognized and [`CodecError::Encode`] if writing fails.
    fn encode(&self, image: &ImageBuffer, path: &Path) -> Result<PathBuf, CodecError>;
}

/// [`Codec`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCodec {
    default_format: ImageFormat,
    jpeg_quality: u8,
}

impl FileCodec {
    /// A codec that writes `default_format` for extension-less paths.
    #[must_use]
    pub const fn new(default_format: ImageFormat) -> Self {
        Self {
            default_format,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the JPEG quality, clamped to `1..=100`.
    #[must_use]
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    /// Format used when a save path has no extension.
    #[must_use]
    pub const fn default_format(&self) -> ImageFormat {
        self.default_format
    }

    /// JPEG encoding quality.
    #[must_use]
    pub const fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    /// Resolve the path and format a save to `path` would use.
    ///
    /// A path without an extension gets the default format's extension
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] for an unrecognized
    /// extension.
    pub fn resolve_output(&self, path: &Path) -> Result<(PathBuf, ImageFormat), CodecError> {
        if path.extension().is_none() {
            let format = self.default_format;
            return Ok((path.with_extension(format.extension()), format));
        }
        ImageFormat::from_path(path)
            .map(|format| (path.to_path_buf(), format))
            .ok_or_else(|| CodecError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }

    fn write(&self, image: &DynamicImage, path: &Path, format: ImageFormat) -> image::ImageResult<()> {
        match format {
            ImageFormat::Jpeg => {
                let file = File::create(path).map_err(image::ImageError::IoError)?;
                let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), self.jpeg_quality);
                image.write_with_encoder(encoder)
            }
            ImageFormat::Png | ImageFormat::Bmp => {
                image.save_with_format(path, format.to_image_format())
            }
        }
    }
}

impl Default for FileCodec {
    fn default() -> Self {
        Self::new(ImageFormat::default())
    }
}

impl Codec for FileCodec {
    fn decode(&self, path: &Path) -> Result<ImageBuffer, CodecError> {
        let format = ImageFormat::from_path(path).ok_or_else(|| CodecError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let decode_error = |source| CodecError::Decode {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = image::ImageReader::open(path)
            .map_err(|e| decode_error(image::ImageError::IoError(e)))?;
        reader.set_format(format.to_image_format());
        // Content sniffing wins over the extension when they disagree.
        let reader = reader
            .with_guessed_format()
            .map_err(|e| decode_error(image::ImageError::IoError(e)))?;
        let decoded = reader.decode().map_err(decode_error)?;

        let image = ImageBuffer::from_dynamic(decoded);
        image.validate()?;
        tracing::debug!(path = %path.display(), info = %image.info(), "decoded image");
        Ok(image)
    }

    fn encode(&self, image: &ImageBuffer, path: &Path) -> Result<PathBuf, CodecError> {
        image.validate()?;
        let (path, format) = self.resolve_output(path)?;

        let mut dynamic = image.to_dynamic();
        if !format.supports_alpha() && image.channels().has_alpha() {
            tracing::debug!(%format, "dropping alpha channel");
            dynamic = DynamicImage::ImageRgb8(dynamic.to_rgb8());
        }

        self.write(&dynamic, &path, format)
            .map_err(|source| CodecError::Encode {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), %format, "encoded image");
        Ok(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retouch_pipeline::Channels;

    fn gradient(channels: u8) -> ImageBuffer {
        let len = 6 * 4 * usize::from(channels);
        let data = (0..len).map(|i| u8::try_from(i * 5 % 256).unwrap()).collect();
        ImageBuffer::from_raw(6, 4, channels, data).unwrap()
    }

    #[test]
    fn png_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let codec = FileCodec::default();
        for channels in [1, 3, 4] {
            let image = gradient(channels);
            let path = dir.path().join(format!("img{channels}.png"));
            let written = codec.encode(&image, &path).unwrap();
            assert_eq!(written, path);
            assert_eq!(codec.decode(&path).unwrap(), image);
        }
    }

    #[test]
    fn bmp_round_trip_keeps_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let codec = FileCodec::default();
        let image = gradient(3);
        let path = dir.path().join("img.bmp");
        codec.encode(&image, &path).unwrap();
        assert_eq!(codec.decode(&path).unwrap(), image);
    }

    #[test]
    fn jpeg_flattens_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let codec = FileCodec::default();
        let image = ImageBuffer::from_pixel(16, 16, &[200, 100, 50, 128]).unwrap();
        let path = dir.path().join("img.JPG");
        codec.encode(&image, &path).unwrap();

        let decoded = codec.decode(&path).unwrap();
        assert_eq!(decoded.channels(), Channels::Rgb);
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn missing_extension_appends_default_format() {
        let dir = tempfile::tempdir().unwrap();
        let written = FileCodec::default()
            .encode(&gradient(3), &dir.path().join("out"))
            .unwrap();
        assert_eq!(written, dir.path().join("out.png"));
        assert!(written.exists());

        let written = FileCodec::new(ImageFormat::Bmp)
            .encode(&gradient(3), &dir.path().join("other"))
            .unwrap();
        assert_eq!(written, dir.path().join("other.bmp"));
    }

    #[test]
    fn encode_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let result = FileCodec::default().encode(&gradient(3), &path);
        assert!(matches!(result, Err(CodecError::UnsupportedFormat { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn encode_rejects_empty_image() {
        let dir = tempfile::tempdir().unwrap();
        let empty = ImageBuffer::from_raw(0, 0, 3, Vec::new()).unwrap();
        let result = FileCodec::default().encode(&empty, &dir.path().join("out.png"));
        assert!(matches!(
            result,
            Err(CodecError::InvalidImage(PipelineError::EmptyImage { .. }))
        ));
    }

    #[test]
    fn decode_unknown_extension_fails_before_reading() {
        // The file does not exist, so a Decode error would mean the disk
        // was touched.
        let result = FileCodec::default().decode(Path::new("/nonexistent/anim.gif"));
        assert!(matches!(result, Err(CodecError::UnsupportedFormat { .. })));
    }

    #[test]
    fn decode_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileCodec::default().decode(&dir.path().join("missing.png"));
        assert!(matches!(result, Err(CodecError::Decode { .. })));
    }

    #[test]
    fn decode_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, b"definitely not an image").unwrap();
        let err = FileCodec::default().decode(&path).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
        assert!(err.to_string().contains("corrupt.png"), "got {err}");
    }

    #[test]
    fn decode_sniffs_mislabelled_content() {
        let dir = tempfile::tempdir().unwrap();
        let codec = FileCodec::default();
        let image = gradient(3);
        let png = codec.encode(&image, &dir.path().join("real.png")).unwrap();
        let mislabelled = dir.path().join("fake.bmp");
        std::fs::copy(&png, &mislabelled).unwrap();
        assert_eq!(codec.decode(&mislabelled).unwrap(), image);
    }

    #[test]
    fn jpeg_quality_is_clamped() {
        assert_eq!(FileCodec::default().jpeg_quality(), DEFAULT_JPEG_QUALITY);
        assert_eq!(FileCodec::default().with_jpeg_quality(0).jpeg_quality(), 1);
        assert_eq!(FileCodec::default().with_jpeg_quality(200).jpeg_quality(), 100);
    }
}
