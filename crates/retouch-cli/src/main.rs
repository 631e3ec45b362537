//! retouch: run a scripted editing session on an image file.
//!
//! Loads an image, applies a sequence of steps (transforms interleaved
//! with `undo`, `redo` and `reset`), optionally writes the result, and
//! prints a report of the final image and history state.
//!
//! # Usage
//!
//! ```text
//! retouch photo.jpg --step grayscale --step blur:5 --step undo --output out.png
//! retouch photo.jpg --steps-json '[{"kind":"resize","width":800,"height":600}]' --json
//! ```
//!
//! Log verbosity is controlled with `RUST_LOG` (default `retouch=info`).

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod step;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use retouch_io::ImageFormat;
use retouch_pipeline::ImageInfo;
use retouch_session::{EditSession, SessionConfig, SessionMetrics};
use serde::Serialize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::step::{Outcome, Step};

/// Scripted image editing with undo/redo.
///
/// Steps run in order: every `--step` first, then every entry of
/// `--steps-json`.
#[derive(Parser)]
#[command(name = "retouch", version)]
struct Cli {
    /// Path to the input image (JPEG, PNG, BMP).
    input: PathBuf,

    /// A transform (`grayscale`, `blur:5`, `edges:50,150`,
    /// `brightness:20`, `contrast:1.5`, `rotate:90`, `flip:horizontal`,
    /// `resize:800x600[:nearest]`) or `undo`, `redo`, `reset`.
    /// Repeatable.
    #[arg(long = "step", value_name = "STEP")]
    steps: Vec<Step>,

    /// Steps as a JSON array, e.g. `["undo", {"kind": "blur", "radius": 5}]`.
    #[arg(long, value_name = "JSON")]
    steps_json: Option<String>,

    /// Write the final image here. The format follows the extension;
    /// without one the default format is used.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Maximum number of history snapshots. Overrides `--config-json`.
    #[arg(long, value_name = "N")]
    history_capacity: Option<usize>,

    /// Format for output paths without an extension. Overrides
    /// `--config-json`.
    #[arg(long, value_name = "FORMAT")]
    default_format: Option<ImageFormat>,

    /// Full session config as a JSON string. Missing fields keep their
    /// defaults.
    #[arg(long, value_name = "JSON")]
    config_json: Option<String>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Final state printed after all steps have run.
#[derive(Debug, Serialize)]
struct Report {
    input: PathBuf,
    output: Option<PathBuf>,
    image: ImageInfo,
    history_len: usize,
    history_cursor: Option<usize>,
    can_undo: bool,
    can_redo: bool,
    metrics: SessionMetrics,
    notices: Vec<String>,
}

impl Report {
    fn text(&self) -> String {
        let mut lines = vec![format!("Image: {} ({})", self.input.display(), self.image)];
        if let Some(ref output) = self.output {
            lines.push(format!("Saved: {}", output.display()));
        }
        lines.push(format!(
            "History: {} states, at index {}",
            self.history_len,
            self.history_cursor
                .map_or_else(|| "-".to_string(), |c| c.to_string()),
        ));
        lines.push(format!(
            "Undo: {}  Redo: {}",
            if self.can_undo { "available" } else { "none" },
            if self.can_redo { "available" } else { "none" },
        ));
        let m = &self.metrics;
        lines.push(format!(
            "Applied: {}  Undos: {}  Redos: {}  Resets: {}",
            m.transforms_applied, m.undos, m.redos, m.resets,
        ));
        for notice in &self.notices {
            lines.push(format!("Note: {notice}"));
        }
        lines.join("\n")
    }
}

/// Build a [`SessionConfig`] from CLI arguments.
///
/// `--config-json` is parsed first; individual flags then override the
/// fields they name.
fn config_from_cli(cli: &Cli) -> Result<SessionConfig, String> {
    let mut config = match cli.config_json {
        Some(ref json) => serde_json::from_str(json)
            .map_err(|e| format!("Error parsing --config-json: {e}"))?,
        None => SessionConfig::default(),
    };
    if let Some(capacity) = cli.history_capacity {
        config.history_capacity = capacity;
    }
    if let Some(format) = cli.default_format {
        config.default_format = format;
    }
    Ok(config)
}

/// All steps in run order.
fn steps_from_cli(cli: &Cli) -> Result<Vec<Step>, String> {
    let mut steps = cli.steps.clone();
    if let Some(ref json) = cli.steps_json {
        let extra: Vec<Step> =
            serde_json::from_str(json).map_err(|e| format!("Error parsing --steps-json: {e}"))?;
        steps.extend(extra);
    }
    Ok(steps)
}

fn run(cli: &Cli) -> Result<Report, String> {
    let config = config_from_cli(cli)?;
    let steps = steps_from_cli(cli)?;

    let mut session = EditSession::new(config);
    let mut image = session.load(&cli.input).map_err(|e| e.to_string())?;

    let mut notices = Vec::new();
    for (index, step) in steps.iter().enumerate() {
        match step.run(&mut session) {
            Ok(Outcome::Done) => {
                tracing::debug!(index, %step, "step done");
            }
            Ok(Outcome::Nothing(notice)) => {
                tracing::info!(index, %step, "{notice}");
                notices.push(format!("step {} ({step}): {notice}", index + 1));
            }
            Err(e) => return Err(format!("Step {} ({step}) failed: {e}", index + 1)),
        }
        if let Some(info) = session.info() {
            image = info;
        }
    }

    let output = cli
        .output
        .as_ref()
        .map(|path| session.save_as(path).map_err(|e| e.to_string()))
        .transpose()?;

    let history = session.history();
    Ok(Report {
        input: cli.input.clone(),
        output,
        image,
        history_len: history.len(),
        history_cursor: history.cursor(),
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
        metrics: session.metrics(),
        notices,
    })
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "retouch=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let report = match run(&cli) {
        Ok(report) => report,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", report.text());
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use retouch_io::{Codec, FileCodec};
    use retouch_pipeline::{ImageBuffer, Transform};

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("retouch").chain(args.iter().copied())).unwrap()
    }

    fn write_input(dir: &std::path::Path) -> PathBuf {
        let image = ImageBuffer::from_pixel(20, 10, &[10, 120, 230]).unwrap();
        FileCodec::default()
            .encode(&image, &dir.join("input.png"))
            .unwrap()
    }

    #[test]
    fn parses_repeated_steps() {
        let cli = parse(&["in.png", "--step", "grayscale", "--step", "undo"]);
        assert_eq!(
            cli.steps,
            vec![
                Step::Apply(Transform::Grayscale),
                "undo".parse::<Step>().unwrap()
            ]
        );
    }

    #[test]
    fn rejects_unknown_step() {
        let result = Cli::try_parse_from(["retouch", "in.png", "--step", "sharpen"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_override_config_json() {
        let cli = parse(&[
            "in.png",
            "--config-json",
            r#"{"history_capacity": 5, "default_format": "bmp"}"#,
            "--history-capacity",
            "7",
        ]);
        let config = config_from_cli(&cli).unwrap();
        assert_eq!(config.history_capacity, 7);
        assert_eq!(config.default_format, ImageFormat::Bmp);
    }

    #[test]
    fn bad_config_json_is_reported() {
        let cli = parse(&["in.png", "--config-json", "{not json"]);
        let err = config_from_cli(&cli).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"), "got {err}");
    }

    #[test]
    fn json_steps_run_after_flag_steps() {
        let cli = parse(&[
            "in.png",
            "--step",
            "grayscale",
            "--steps-json",
            r#"[{"kind": "blur", "radius": 3}, "redo"]"#,
        ]);
        let steps = steps_from_cli(&cli).unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1], Step::Apply(Transform::Blur { radius: 3 }));
    }

    #[test]
    fn run_applies_steps_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let output = dir.path().join("out");
        let cli = parse(&[
            input.to_str().unwrap(),
            "--step",
            "rotate:90",
            "--step",
            "grayscale",
            "--step",
            "undo",
            "--step",
            "redo",
            "--step",
            "redo",
            "--output",
            output.to_str().unwrap(),
        ]);

        let report = run(&cli).unwrap();

        assert_eq!((report.image.width, report.image.height), (10, 20));
        assert_eq!(report.output, Some(dir.path().join("out.png")));
        assert_eq!(report.history_len, 3);
        assert_eq!(report.history_cursor, Some(2));
        assert_eq!(report.metrics.transforms_applied, 2);
        assert_eq!(report.notices.len(), 1);
        assert!(report.notices[0].contains("nothing to redo"));
        assert!(dir.path().join("out.png").exists());
    }

    #[test]
    fn run_fails_on_invalid_step() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_input(dir.path());
        let cli = parse(&[input.to_str().unwrap(), "--step", "resize:0x10"]);
        let err = run(&cli).unwrap_err();
        assert!(err.starts_with("Step 1 (Resize(0x10, linear)) failed"), "got {err}");
    }

    #[test]
    fn run_fails_on_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        let cli = parse(&[missing.to_str().unwrap()]);
        assert!(run(&cli).unwrap_err().contains("failed to load image"));
    }

    #[test]
    fn text_report_lists_history_position() {
        let report = Report {
            input: PathBuf::from("in.png"),
            output: None,
            image: ImageInfo {
                width: 4,
                height: 3,
                channels: 3,
            },
            history_len: 2,
            history_cursor: Some(1),
            can_undo: true,
            can_redo: false,
            metrics: SessionMetrics::default(),
            notices: vec!["step 2 (undo): nothing to undo".to_string()],
        };
        let text = report.text();
        assert!(text.contains("Image: in.png (4x3, 3 channels)"));
        assert!(text.contains("History: 2 states, at index 1"));
        assert!(text.contains("Note: step 2 (undo): nothing to undo"));
    }
}
