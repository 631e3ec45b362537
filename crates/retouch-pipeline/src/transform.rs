//! The closed set of edits the editor can apply.
//!
//! [`Transform`] is a tagged variant over every supported operation with
//! its parameters inline. [`Transform::apply`] dispatches with a single
//! `match` to the module implementing that operation. Every variant is a
//! pure function of its input buffer: the input is never modified and
//! the same input always produces the same output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::chain::FilterChain;
use crate::geometry::{FlipAxis, Rotation};
use crate::resize::ResizeFilter;
use crate::types::PipelineError;
use crate::{adjust, blur, edge, geometry, grayscale, resize};

/// Blur radius used when none is given.
pub const DEFAULT_BLUR_RADIUS: u32 = 5;

/// A single editing operation.
///
/// Serialized internally tagged by `kind`:
///
/// ```rust
/// # use retouch_pipeline::Transform;
/// let t: Transform = serde_json::from_str(r#"{"kind":"blur","radius":5}"#).unwrap();
/// assert_eq!(t, Transform::Blur { radius: 5 });
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    /// Luminance-weighted grayscale, re-expanded to the input's channels.
    Grayscale,

    /// Gaussian blur. The radius is normalized to an odd kernel size in
    /// `1..=99` when applied; see [`blur::kernel_size`].
    Blur {
        /// Requested kernel size.
        radius: u32,
    },

    /// Canny edges, rendered dark on a light background.
    EdgeDetection {
        /// Hysteresis low threshold.
        #[serde(default = "default_low_threshold")]
        low_threshold: f32,
        /// Hysteresis high threshold.
        #[serde(default = "default_high_threshold")]
        high_threshold: f32,
    },

    /// Additive offset on color samples.
    Brightness {
        /// Offset added to each sample before clamping.
        delta: i32,
    },

    /// Multiplicative scale about mid-gray.
    Contrast {
        /// Scale factor; 1.0 is the identity.
        factor: f32,
    },

    /// Clockwise quarter-turn rotation.
    Rotate {
        /// 90, 180 or 270.
        degrees: Rotation,
    },

    /// Mirror along an axis.
    Flip {
        /// Which way to mirror.
        axis: FlipAxis,
    },

    /// Resample to an exact size. Dimensions are signed so that
    /// out-of-range requests can be represented and rejected.
    Resize {
        /// Target width in pixels.
        width: i32,
        /// Target height in pixels.
        height: i32,
        /// Resampling filter.
        #[serde(default)]
        filter: ResizeFilter,
    },

    /// Several transforms applied as one edit.
    Chain(FilterChain),
}

const fn default_low_threshold() -> f32 {
    edge::DEFAULT_LOW_THRESHOLD
}

const fn default_high_threshold() -> f32 {
    edge::DEFAULT_HIGH_THRESHOLD
}

impl Transform {
    /// Edge detection with the default 50/150 thresholds.
    #[must_use]
    pub const fn edge_detection() -> Self {
        Self::EdgeDetection {
            low_threshold: edge::DEFAULT_LOW_THRESHOLD,
            high_threshold: edge::DEFAULT_HIGH_THRESHOLD,
        }
    }

    /// Resize with the default (linear) filter.
    #[must_use]
    pub const fn resize(width: i32, height: i32) -> Self {
        Self::Resize {
            width,
            height,
            filter: ResizeFilter::Linear,
        }
    }

    /// Human-readable operation name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Grayscale => "Grayscale",
            Self::Blur { .. } => "Blur",
            Self::EdgeDetection { .. } => "Edge Detection",
            Self::Brightness { .. } => "Brightness",
            Self::Contrast { .. } => "Contrast",
            Self::Rotate { .. } => "Rotate",
            Self::Flip { .. } => "Flip",
            Self::Resize { .. } => "Resize",
            Self::Chain(_) => "Chain",
        }
    }

    /// Apply this transform, producing a new buffer.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyImage`] if `image` has a zero
    /// dimension, and [`PipelineError::InvalidParameter`] if a parameter
    /// is out of range (resize bounds, negative contrast, non-finite
    /// thresholds). A chain returns the first error among its steps.
    pub fn apply(&self, image: &ImageBuffer) -> Result<ImageBuffer, PipelineError> {
        image.validate()?;
        match self {
            Self::Grayscale => Ok(grayscale::grayscale(image)),
            Self::Blur { radius } => Ok(blur::gaussian_blur(image, *radius)),
            Self::EdgeDetection {
                low_threshold,
                high_threshold,
            } => edge::detect_edges(image, *low_threshold, *high_threshold),
            Self::Brightness { delta } => Ok(adjust::brightness(image, *delta)),
            Self::Contrast { factor } => adjust::contrast(image, *factor),
            Self::Rotate { degrees } => Ok(geometry::rotate(image, *degrees)),
            Self::Flip { axis } => Ok(geometry::flip(image, *axis)),
            Self::Resize {
                width,
                height,
                filter,
            } => resize::resize(image, *width, *height, *filter),
            Self::Chain(chain) => chain.apply(image),
        }
    }

    /// Merge two transforms into one, where a merge is defined.
    ///
    /// Two blurs combine into a single blur whose radius is the sum of
    /// both radii (saturating, not clamped; clamping happens on apply).
    /// Every other pair returns `None`.
    #[must_use]
    pub const fn combine(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Blur { radius: a }, Self::Blur { radius: b }) => Some(Self::Blur {
                radius: a.saturating_add(*b),
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grayscale => f.write_str("Grayscale"),
            Self::Blur { radius } => write!(f, "Blur(radius={radius})"),
            Self::EdgeDetection {
                low_threshold,
                high_threshold,
            } => write!(f, "Edge Detection(low={low_threshold}, high={high_threshold})"),
            Self::Brightness { delta } => write!(f, "Brightness(delta={delta})"),
            Self::Contrast { factor } => write!(f, "Contrast(factor={factor})"),
            Self::Rotate { degrees } => write!(f, "Rotate(degrees={degrees})"),
            Self::Flip { axis } => write!(f, "Flip(axis={axis})"),
            Self::Resize {
                width,
                height,
                filter,
            } => write!(f, "Resize({width}x{height}, {filter})"),
            Self::Chain(chain) => write!(f, "Chain{chain}"),
        }
    }
}

fn parse_value<T>(text: &str, what: &str) -> Result<T, PipelineError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e| PipelineError::InvalidParameter(format!("invalid {what} '{text}': {e}")))
}

fn require<'a>(args: Option<&'a str>, kind: &str, usage: &str) -> Result<&'a str, PipelineError> {
    args.ok_or_else(|| PipelineError::InvalidParameter(format!("{kind} requires a value ({usage})")))
}

/// Parses the compact `kind[:args]` form used on the command line:
///
/// `grayscale`, `blur[:RADIUS]`, `edges[:LOW,HIGH]`, `brightness:DELTA`,
/// `contrast:FACTOR`, `rotate:DEGREES`, `flip:horizontal|vertical`,
/// `resize:WIDTHxHEIGHT[:nearest|linear]`.
impl FromStr for Transform {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        let (kind, args) = match value.split_once(':') {
            Some((kind, args)) => (kind, Some(args)),
            None => (value, None),
        };
        let kind = kind.trim().to_ascii_lowercase();

        match kind.as_str() {
            "grayscale" | "gray" => Ok(Self::Grayscale),
            "blur" => Ok(Self::Blur {
                radius: args.map_or(Ok(DEFAULT_BLUR_RADIUS), |a| parse_value(a, "blur radius"))?,
            }),
            "edges" | "edge" | "edge_detection" => match args {
                None => Ok(Self::edge_detection()),
                Some(a) => {
                    let (low, high) = a.split_once(',').ok_or_else(|| {
                        PipelineError::InvalidParameter(format!(
                            "edge thresholds must be LOW,HIGH, got '{a}'"
                        ))
                    })?;
                    Ok(Self::EdgeDetection {
                        low_threshold: parse_value(low, "low threshold")?,
                        high_threshold: parse_value(high, "high threshold")?,
                    })
                }
            },
            "brightness" => Ok(Self::Brightness {
                delta: parse_value(require(args, "brightness", "brightness:DELTA")?, "delta")?,
            }),
            "contrast" => Ok(Self::Contrast {
                factor: parse_value(require(args, "contrast", "contrast:FACTOR")?, "factor")?,
            }),
            "rotate" => {
                let degrees = parse_value(require(args, "rotate", "rotate:90")?, "angle")?;
                Ok(Self::Rotate {
                    degrees: Rotation::from_degrees(degrees)?,
                })
            }
            "flip" => Ok(Self::Flip {
                axis: require(args, "flip", "flip:horizontal")?.parse()?,
            }),
            "resize" => {
                let a = require(args, "resize", "resize:WIDTHxHEIGHT")?;
                let (size, filter) = match a.split_once(':') {
                    Some((size, filter)) => (size, filter.parse()?),
                    None => (a, ResizeFilter::default()),
                };
                let (width, height) = size.split_once(['x', 'X']).ok_or_else(|| {
                    PipelineError::InvalidParameter(format!(
                        "resize size must be WIDTHxHEIGHT, got '{size}'"
                    ))
                })?;
                Ok(Self::Resize {
                    width: parse_value(width, "width")?,
                    height: parse_value(height, "height")?,
                    filter,
                })
            }
            other => Err(PipelineError::InvalidParameter(format!(
                "unknown transform '{other}'"
            ))),
        }
    }
}
