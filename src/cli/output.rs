//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::error::Error;
use crate::extract::Extraction;
use crate::pipeline::{PassOutcome, SkipReason};
use serde::Serialize;
use std::fmt::Write;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Formats a denylist verdict.
#[must_use]
pub fn format_check(denylisted: bool, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            if denylisted {
                "denylisted: message contains forbidden directives\n".to_string()
            } else {
                "clean\n".to_string()
            }
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Verdict {
                denylisted: bool,
            }
            format_json(&Verdict { denylisted })
        }
    }
}

/// Formats extracted fragment pairs.
#[must_use]
pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let _ = writeln!(output, "{} fragment(s)", extraction.len());
            for (i, (command, snippet)) in extraction.pairs().enumerate() {
                let _ = writeln!(output, "  [{i}] \\{command}{{{snippet}}}");
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Fragment<'a> {
                index: usize,
                command: &'a str,
                snippet: &'a str,
            }
            let fragments: Vec<_> = extraction
                .pairs()
                .enumerate()
                .map(|(index, (command, snippet))| Fragment {
                    index,
                    command,
                    snippet,
                })
                .collect();
            format_json(&fragments)
        }
    }
}

/// One written artifact, for render output.
#[derive(Debug, Serialize)]
pub struct WrittenArtifact {
    /// Artifact id embedded in the message.
    pub id: u32,
    /// Path the image was written to.
    pub path: String,
}

/// Formats the result of a full render pass.
#[must_use]
pub fn format_render(
    original: &str,
    outcome: &PassOutcome,
    artifacts: &[WrittenArtifact],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_render_text(original, outcome, artifacts),
        OutputFormat::Json => format_render_json(original, outcome, artifacts),
    }
}

fn skip_reason_label(reason: &SkipReason) -> String {
    match reason {
        SkipReason::NoWork => "no-work".to_string(),
        SkipReason::Denylisted => "denylisted".to_string(),
        SkipReason::Inconsistent(err) => format!("inconsistent ({err})"),
    }
}

fn format_render_text(
    original: &str,
    outcome: &PassOutcome,
    artifacts: &[WrittenArtifact],
) -> String {
    let mut output = String::new();
    match outcome {
        PassOutcome::Unchanged(reason) => {
            let _ = writeln!(output, "unchanged: {}", skip_reason_label(reason));
            let _ = writeln!(output, "{original}");
        }
        PassOutcome::Spliced(report) => {
            let _ = writeln!(
                output,
                "spliced {} fragment(s), {} failure(s)",
                report.spliced,
                report.failures.len()
            );
            for failure in &report.failures {
                let _ = writeln!(
                    output,
                    "  fragment {} (\\{}): {}",
                    failure.index, failure.command, failure.error
                );
            }
            for artifact in artifacts {
                let _ = writeln!(output, "  image {} -> {}", artifact.id, artifact.path);
            }
            let _ = writeln!(output, "{}", report.text);
        }
    }
    output
}

fn format_render_json(
    original: &str,
    outcome: &PassOutcome,
    artifacts: &[WrittenArtifact],
) -> String {
    #[derive(Serialize)]
    struct Failure {
        index: usize,
        command: String,
        error: String,
    }

    #[derive(Serialize)]
    struct RenderResult<'a> {
        changed: bool,
        reason: Option<String>,
        text: &'a str,
        spliced: usize,
        failures: Vec<Failure>,
        artifacts: &'a [WrittenArtifact],
    }

    let result = match outcome {
        PassOutcome::Unchanged(reason) => RenderResult {
            changed: false,
            reason: Some(skip_reason_label(reason)),
            text: original,
            spliced: 0,
            failures: Vec::new(),
            artifacts,
        },
        PassOutcome::Spliced(report) => RenderResult {
            changed: report.spliced > 0,
            reason: None,
            text: &report.text,
            spliced: report.spliced,
            failures: report
                .failures
                .iter()
                .map(|f| Failure {
                    index: f.index,
                    command: f.command.clone(),
                    error: f.error.to_string(),
                })
                .collect(),
            artifacts,
        },
    };
    format_json(&result)
}

/// Formats an error for the selected output format.
#[must_use]
pub fn format_error(err: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => err.to_string(),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct ErrorOutput {
                error: String,
            }
            format_json(&ErrorOutput {
                error: err.to_string(),
            })
        }
    }
}

fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}
