//! Ordered sequences of transforms applied as one edit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::buffer::ImageBuffer;
use crate::transform::Transform;
use crate::types::PipelineError;

/// An ordered list of [`Transform`]s applied left to right.
///
/// Serialized as `{"steps": [...]}` so it can nest inside an internally
/// tagged [`Transform::Chain`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterChain {
    steps: Vec<Transform>,
}

impl FilterChain {
    /// An empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Append `transform` and return the chain, for builder-style use.
    #[must_use]
    pub fn then(mut self, transform: Transform) -> Self {
        self.steps.push(transform);
        self
    }

    /// Append `transform` in place.
    pub fn push(&mut self, transform: Transform) {
        self.steps.push(transform);
    }

    /// Number of steps.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` if the chain has no steps.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The step at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.steps.get(index)
    }

    /// All steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[Transform] {
        &self.steps
    }

    /// Iterate over the steps in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Transform> {
        self.steps.iter()
    }

    /// Run every step in order, feeding each output to the next.
    ///
    /// An empty chain returns a copy of the input.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyImage`] if `image` has a zero
    /// dimension, otherwise the first error produced by a step. Later
    /// steps are not run.
    pub fn apply(&self, image: &ImageBuffer) -> Result<ImageBuffer, PipelineError> {
        image.validate()?;
        self.steps
            .iter()
            .enumerate()
            .try_fold(image.clone(), |current, (index, step)| {
                tracing::trace!(index, step = %step, "applying chain step");
                step.apply(&current)
            })
    }
}

impl FromIterator<Transform> for FilterChain {
    fn from_iter<I: IntoIterator<Item = Transform>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl Extend<Transform> for FilterChain {
    fn extend<I: IntoIterator<Item = Transform>>(&mut self, iter: I) {
        self.steps.extend(iter);
    }
}

impl<'a> IntoIterator for &'a FilterChain {
    type Item = &'a Transform;
    type IntoIter = std::slice::Iter<'a, Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for FilterChain {
    type Item = Transform;
    type IntoIter = std::vec::IntoIter<Transform>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

/// Renders as `[Grayscale -> Blur(radius=5)]`.
impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{step}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::geometry::{FlipAxis, Rotation};

    fn sample() -> ImageBuffer {
        ImageBuffer::from_raw(3, 2, 1, vec![1, 2, 3, 4, 5, 6]).unwrap()
    }

    #[test]
    fn empty_chain_returns_copy() {
        let img = sample();
        assert_eq!(FilterChain::new().apply(&img).unwrap(), img);
    }

    #[test]
    fn empty_chain_still_rejects_empty_buffer() {
        let empty = ImageBuffer::from_raw(0, 3, 1, Vec::new()).unwrap();
        assert!(matches!(
            FilterChain::new().apply(&empty),
            Err(PipelineError::EmptyImage { .. })
        ));
    }

    #[test]
    fn steps_run_left_to_right() {
        let chain = FilterChain::new()
            .then(Transform::Rotate {
                degrees: Rotation::Quarter,
            })
            .then(Transform::Flip {
                axis: FlipAxis::Horizontal,
            });
        let out = chain.apply(&sample()).unwrap();

        // rotate: [4 1; 5 2; 6 3], then mirror each row
        assert_eq!((out.width(), out.height()), (2, 3));
        assert_eq!(out.as_raw(), &[1, 4, 2, 5, 3, 6]);
    }

    #[test]
    fn matches_sequential_application() {
        let steps = [
            Transform::Brightness { delta: 30 },
            Transform::Contrast { factor: 2.0 },
            Transform::Flip {
                axis: FlipAxis::Vertical,
            },
        ];
        let chain: FilterChain = steps.iter().cloned().collect();

        let mut expected = sample();
        for step in &steps {
            expected = step.apply(&expected).unwrap();
        }
        assert_eq!(chain.apply(&sample()).unwrap(), expected);
    }

    #[test]
    fn first_error_short_circuits() {
        let chain = FilterChain::new()
            .then(Transform::Grayscale)
            .then(Transform::resize(0, 10))
            .then(Transform::Contrast { factor: -1.0 });
        let err = chain.apply(&sample()).unwrap_err();
        assert!(
            err.to_string().contains("width"),
            "expected the resize error, got {err}"
        );
    }

    #[test]
    fn push_and_get() {
        let mut chain = FilterChain::new();
        assert!(chain.is_empty());
        chain.push(Transform::Grayscale);
        chain.extend([Transform::Blur { radius: 3 }]);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.get(1), Some(&Transform::Blur { radius: 3 }));
        assert_eq!(chain.get(2), None);
        assert_eq!(chain.iter().count(), 2);
    }

    #[test]
    fn display_joins_steps() {
        let chain = FilterChain::new()
            .then(Transform::Grayscale)
            .then(Transform::Blur { radius: 5 });
        assert_eq!(chain.to_string(), "[Grayscale -> Blur(radius=5)]");
        assert_eq!(
            Transform::Chain(chain).to_string(),
            "Chain[Grayscale -> Blur(radius=5)]"
        );
    }

    #[test]
    fn nests_inside_tagged_transform_json() {
        let chain = Transform::Chain(
            FilterChain::new()
                .then(Transform::Grayscale)
                .then(Transform::Blur { radius: 3 }),
        );
        let json = serde_json::to_string(&chain).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"chain","steps":[{"kind":"grayscale"},{"kind":"blur","radius":3}]}"#
        );
        let back: Transform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, chain);
    }
}
