//! Supported on-disk image formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A file format the editor can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// JPEG. Lossy and without alpha.
    Jpeg,
    /// PNG.
    #[default]
    Png,
    /// Windows bitmap.
    Bmp,
}

impl ImageFormat {
    /// All supported formats.
    pub const ALL: [Self; 3] = [Self::Jpeg, Self::Png, Self::Bmp];

    /// Match a file extension, ignoring case. Accepts `jpg`, `jpeg`,
    /// `png` and `bmp`.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Detect the format from a path's extension.
    ///
    /// Returns `None` if the path has no extension or an unsupported one.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical file extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }

    /// Whether the format can store an alpha channel.
    #[must_use]
    pub const fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg)
    }

    pub(crate) const fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg => f.write_str("jpeg"),
            Self::Png => f.write_str("png"),
            Self::Bmp => f.write_str("bmp"),
        }
    }
}

impl FromStr for ImageFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::from_extension(value.trim().trim_start_matches('.'))
            .ok_or_else(|| format!("unknown image format '{value}'. Expected jpeg, png or bmp"))
    }
}
