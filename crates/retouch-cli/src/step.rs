//! Scripted session steps.

use std::fmt;
use std::str::FromStr;

use retouch_pipeline::{PipelineError, Transform};
use retouch_session::{EditSession, SessionError};
use serde::{Deserialize, Serialize};

/// History navigation that can be interleaved with transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    /// Step back one snapshot.
    Undo,
    /// Step forward one snapshot.
    Redo,
    /// Return to the loaded image and clear history.
    Reset,
}

/// One step of a scripted session.
///
/// In JSON a control step is a bare string and a transform is a tagged
/// object: `["undo", {"kind": "blur", "radius": 5}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Step {
    /// Navigate history.
    Control(Control),
    /// Apply a transform.
    Apply(Transform),
}

/// What running a step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The session changed.
    Done,
    /// `undo` or `redo` had nowhere to go. Not an error.
    Nothing(&'static str),
}

impl Step {
    /// Run this step against `session`.
    ///
    /// # Errors
    ///
    /// Propagates the session's error for transforms and resets.
    pub fn run<C: retouch_io::Codec>(
        &self,
        session: &mut EditSession<C>,
    ) -> Result<Outcome, SessionError> {
        match self {
            Self::Apply(transform) => session.apply(transform).map(|_| Outcome::Done),
            Self::Control(Control::Undo) => Ok(session
                .undo()
                .map_or(Outcome::Nothing("nothing to undo"), |_| Outcome::Done)),
            Self::Control(Control::Redo) => Ok(session
                .redo()
                .map_or(Outcome::Nothing("nothing to redo"), |_| Outcome::Done)),
            Self::Control(Control::Reset) => session.reset_to_original().map(|_| Outcome::Done),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Control(Control::Undo) => f.write_str("undo"),
            Self::Control(Control::Redo) => f.write_str("redo"),
            Self::Control(Control::Reset) => f.write_str("reset"),
            Self::Apply(transform) => write!(f, "{transform}"),
        }
    }
}

impl FromStr for Step {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "undo" => Ok(Self::Control(Control::Undo)),
            "redo" => Ok(Self::Control(Control::Redo)),
            "reset" => Ok(Self::Control(Control::Reset)),
            _ => value.parse().map(Self::Apply),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retouch_pipeline::ImageBuffer;

    #[test]
    fn parses_controls_and_transforms() {
        assert_eq!("undo".parse::<Step>().unwrap(), Step::Control(Control::Undo));
        assert_eq!("Redo".parse::<Step>().unwrap(), Step::Control(Control::Redo));
        assert_eq!("reset".parse::<Step>().unwrap(), Step::Control(Control::Reset));
        assert_eq!(
            "blur:3".parse::<Step>().unwrap(),
            Step::Apply(Transform::Blur { radius: 3 })
        );
        assert!("sharpen".parse::<Step>().is_err());
    }

    #[test]
    fn json_mixes_strings_and_objects() {
        let steps: Vec<Step> =
            serde_json::from_str(r#"["undo", {"kind": "blur", "radius": 5}, "reset"]"#).unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Control(Control::Undo),
                Step::Apply(Transform::Blur { radius: 5 }),
                Step::Control(Control::Reset),
            ]
        );
    }

    #[test]
    fn run_reports_nothing_to_undo() {
        let mut session = EditSession::default();
        session
            .load_buffer(ImageBuffer::from_pixel(4, 4, &[9, 9, 9]).unwrap())
            .unwrap();

        let undo = Step::Control(Control::Undo);
        assert_eq!(undo.run(&mut session).unwrap(), Outcome::Nothing("nothing to undo"));

        let gray = Step::Apply(Transform::Grayscale);
        assert_eq!(gray.run(&mut session).unwrap(), Outcome::Done);
        assert_eq!(undo.run(&mut session).unwrap(), Outcome::Done);
        assert_eq!(
            Step::Control(Control::Redo).run(&mut session).unwrap(),
            Outcome::Done
        );
    }

    #[test]
    fn display() {
        assert_eq!(Step::Control(Control::Reset).to_string(), "reset");
        assert_eq!(
            Step::Apply(Transform::Brightness { delta: -3 }).to_string(),
            "Brightness(delta=-3)"
        );
    }
}
