//! Message pipeline orchestration.
//!
//! One [`Pipeline`] pass takes a message buffer through four terminal
//! states, stopping at the first that applies:
//!
//! 1. `NoWork` - no backslash in the text, nothing to do.
//! 2. `Denylisted` - unsafe directive found, pass through unmodified.
//! 3. `Inconsistent` - extraction failed, pass through unmodified rather
//!    than risk a mangled partial substitution (fail-closed).
//! 4. `Spliced` - fragments rendered and image tags spliced in; render
//!    failures are per-fragment, never pass-fatal (fail-soft).
//!
//! The asymmetry between 3 and 4 is deliberate. Passes are synchronous
//! and each owns its buffer exclusively; the denylist is the only shared
//! state and it is read-only.
//!
//! The pipeline is an explicit context object: construct it with a
//! renderer at startup, call it per message, drop it for teardown.

use crate::denylist::is_denylisted;
use crate::error::ExtractError;
use crate::extract::extract;
use crate::splice::{Render, SpliceReport, splice};
use std::fmt;
use tracing::{debug, warn};

/// Which way the message is traveling through the host.
///
/// Both directions run the identical pass; the host decides what to do
/// with the result (send vs. display-and-log).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pre-send interception of a message the user is sending.
    Outgoing,
    /// Pre-display interception of a received message.
    Incoming,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => f.write_str("outgoing"),
            Self::Incoming => f.write_str("incoming"),
        }
    }
}

/// Why a pass left the message untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The text contains no backslash.
    NoWork,
    /// The text matched the denylist; suppressed for safety.
    Denylisted,
    /// Extraction was inconsistent; aborted whole-message (fail-closed).
    Inconsistent(ExtractError),
}

/// Result of one pipeline pass.
#[derive(Debug)]
pub enum PassOutcome {
    /// The message passes through unmodified.
    Unchanged(SkipReason),
    /// Zero or more fragments were replaced with image tags.
    Spliced(SpliceReport),
}

impl PassOutcome {
    /// Returns `true` if the message was left untouched.
    #[must_use]
    pub const fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged(_))
    }

    /// Returns the text the host should use: the transformed buffer, or
    /// the original when the pass made no changes.
    #[must_use]
    pub fn output<'a>(&'a self, original: &'a str) -> &'a str {
        match self {
            Self::Unchanged(_) => original,
            Self::Spliced(report) => &report.text,
        }
    }
}

/// Per-process pipeline context.
///
/// Owns the rendering collaborator; everything else a pass needs is
/// either the message itself or process-wide read-only state.
#[derive(Debug)]
pub struct Pipeline<R> {
    renderer: R,
}

impl<R: Render> Pipeline<R> {
    /// Creates a pipeline over a rendering collaborator.
    pub const fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// Transforms an outgoing message before the host sends it.
    pub fn transform_outgoing(&mut self, text: &str) -> PassOutcome {
        self.run(Direction::Outgoing, text)
    }

    /// Transforms an incoming message before the host displays it.
    pub fn transform_incoming(&mut self, text: &str) -> PassOutcome {
        self.run(Direction::Incoming, text)
    }

    /// Returns a reference to the rendering collaborator.
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consumes the pipeline, returning the rendering collaborator.
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn run(&mut self, direction: Direction, text: &str) -> PassOutcome {
        if !text.contains('\\') {
            debug!(%direction, "no backslash; passing message through");
            return PassOutcome::Unchanged(SkipReason::NoWork);
        }

        if is_denylisted(text) {
            warn!(%direction, "message contains denylisted code; not analyzed");
            return PassOutcome::Unchanged(SkipReason::Denylisted);
        }

        let extraction = match extract(text) {
            Ok(extraction) => extraction,
            Err(err) => {
                warn!(%direction, %err, "extraction inconsistent; passing message through");
                return PassOutcome::Unchanged(SkipReason::Inconsistent(err));
            }
        };

        let report = splice(text, &extraction, &mut self.renderer);
        debug!(
            %direction,
            fragments = extraction.len(),
            spliced = report.spliced,
            failed = report.failures.len(),
            "pass complete"
        );
        PassOutcome::Spliced(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::splice::ArtifactId;

    fn ok_renderer(start: u32) -> impl Render {
        let mut next = start;
        move |_: &str, _: &str| {
            let id = ArtifactId::new(next).ok_or(RenderError::StoreRejected)?;
            next += 1;
            Ok(id)
        }
    }

    #[test]
    fn test_no_work_branch() {
        let mut pipeline = Pipeline::new(ok_renderer(1));
        let text = "hello, just words and {braces}";
        let outcome = pipeline.transform_outgoing(text);
        assert!(matches!(
            outcome,
            PassOutcome::Unchanged(SkipReason::NoWork)
        ));
        assert_eq!(outcome.output(text), text);
    }

    #[test]
    fn test_denylisted_branch() {
        let mut pipeline = Pipeline::new(ok_renderer(1));
        let text = r"\def\x{y}";
        let outcome = pipeline.transform_outgoing(text);
        assert!(matches!(
            outcome,
            PassOutcome::Unchanged(SkipReason::Denylisted)
        ));
        assert_eq!(outcome.output(text), text);
    }

    #[test]
    fn test_inconsistent_branch_fail_closed() {
        let mut pipeline = Pipeline::new(ok_renderer(1));
        let text = r"\alpha with {two} {groups}";
        let outcome = pipeline.transform_incoming(text);
        assert!(matches!(
            outcome,
            PassOutcome::Unchanged(SkipReason::Inconsistent(_))
        ));
        assert_eq!(outcome.output(text), text);
    }

    #[test]
    fn test_spliced_branch() {
        let mut pipeline = Pipeline::new(ok_renderer(7));
        let text = r"before \cmd{arg} after";
        let outcome = pipeline.transform_outgoing(text);

        let PassOutcome::Spliced(report) = outcome else {
            unreachable!("expected spliced outcome");
        };
        assert_eq!(report.text, "before <img id=\"7\"> after");
        assert_eq!(report.spliced, 1);
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_directions_share_semantics() {
        let mut out_pipeline = Pipeline::new(ok_renderer(1));
        let mut in_pipeline = Pipeline::new(ok_renderer(1));
        let text = r"\a{x} and \b{y}";

        let out = out_pipeline.transform_outgoing(text);
        let inc = in_pipeline.transform_incoming(text);
        assert_eq!(out.output(text), inc.output(text));
    }

    #[test]
    fn test_render_failure_is_not_pass_fatal() {
        let mut pipeline = Pipeline::new(|_: &str, _: &str| {
            Err::<ArtifactId, _>(RenderError::StoreRejected)
        });
        let text = r"\a{x}";
        let outcome = pipeline.transform_outgoing(text);

        let PassOutcome::Spliced(report) = outcome else {
            unreachable!("expected spliced outcome");
        };
        assert_eq!(report.text, text);
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let mut pipeline = Pipeline::new(ok_renderer(1));
        let text = r"\cmd{arg}";

        let first = pipeline.transform_outgoing(text);
        let output = first.output(text).to_string();
        assert_eq!(output, "<img id=\"1\">");

        // The substituted text contains no backslash, so a second pass
        // takes the NoWork branch.
        let second = pipeline.transform_outgoing(&output);
        assert!(matches!(
            second,
            PassOutcome::Unchanged(SkipReason::NoWork)
        ));
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Outgoing.to_string(), "outgoing");
        assert_eq!(Direction::Incoming.to_string(), "incoming");
    }
}
