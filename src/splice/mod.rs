//! Fragment/artifact correlation and in-place splicing.
//!
//! Each extracted `(command, snippet)` pair is handed to the rendering
//! collaborator; on success the pair's original `\command{snippet}` text
//! is replaced with an `<img id="N">` reference tag. Replacements are
//! collected as an ordered edit list over the original buffer and applied
//! in a single left-to-right pass, so no fragment can match inside an
//! earlier substitution and pair `i` always targets its own physical
//! occurrence.
//!
//! Failures are per-fragment: a fragment that cannot be located or
//! rendered stays as literal source text and the rest of the message is
//! still processed.

use crate::error::{FragmentError, RenderError};
use crate::extract::Extraction;
use std::fmt;
use std::num::NonZeroU32;
use std::ops::Range;
use tracing::warn;

/// Opaque non-zero identifier for one rendered artifact.
///
/// Assigned by the host's artifact store; the message buffer references it
/// via the image tag but does not own the artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactId(NonZeroU32);

impl ArtifactId {
    /// Creates an id from a raw value, rejecting zero.
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ArtifactId {
    /// Formats as a plain decimal integer, exactly as embedded in the tag.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rendering collaborator interface.
///
/// Implementations typeset one fragment and register the result with the
/// host's artifact store, returning the assigned id. Failure is reported
/// via [`RenderError`], never a panic.
pub trait Render {
    /// Renders one fragment to an artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if typesetting or artifact registration
    /// fails; the caller degrades gracefully for that fragment.
    fn render(&mut self, command: &str, snippet: &str) -> Result<ArtifactId, RenderError>;
}

impl<F> Render for F
where
    F: FnMut(&str, &str) -> Result<ArtifactId, RenderError>,
{
    fn render(&mut self, command: &str, snippet: &str) -> Result<ArtifactId, RenderError> {
        self(command, snippet)
    }
}

/// One per-fragment failure recorded during splicing.
#[derive(Debug)]
pub struct SpliceFailure {
    /// Index of the fragment in the extraction sequences.
    pub index: usize,
    /// Command token of the failed fragment.
    pub command: String,
    /// What went wrong.
    pub error: FragmentError,
}

/// Outcome of splicing one message.
#[derive(Debug)]
pub struct SpliceReport {
    /// The buffer with zero or more substitutions applied.
    pub text: String,
    /// Number of fragments successfully replaced.
    pub spliced: usize,
    /// Fragments left as literal source text, with reasons.
    pub failures: Vec<SpliceFailure>,
}

/// Formats the embedded-image reference tag for an artifact.
///
/// The exact shape `<img id="N">` is the wire contract with the host's
/// rendering layer.
#[must_use]
pub fn image_tag(id: ArtifactId) -> String {
    format!("<img id=\"{id}\">")
}

/// Renders each extracted fragment and splices image tags into the buffer.
///
/// Fragments are processed left to right. Each pair's literal source text
/// `\command{snippet}` is located at or after the end of the previous
/// pair's occurrence, so equal-text fragments map to their own distinct
/// occurrences. A pair whose source text cannot be located (the command
/// and its group were not adjacent in the original text) is skipped
/// without invoking the renderer.
pub fn splice<R>(text: &str, extraction: &Extraction, renderer: &mut R) -> SpliceReport
where
    R: Render + ?Sized,
{
    let mut edits: Vec<(Range<usize>, String)> = Vec::new();
    let mut failures = Vec::new();
    let mut cursor = 0usize;

    for (index, (command, snippet)) in extraction.pairs().enumerate() {
        let needle = format!("\\{command}{{{snippet}}}");

        let Some(found) = text[cursor..].find(&needle) else {
            warn!(index, command, "fragment source text not located; leaving literal");
            failures.push(SpliceFailure {
                index,
                command: command.to_string(),
                error: FragmentError::NotLocated,
            });
            continue;
        };

        let start = cursor + found;
        let span = start..start + needle.len();
        cursor = span.end;

        match renderer.render(command, snippet) {
            Ok(id) => edits.push((span, image_tag(id))),
            Err(error) => {
                warn!(index, command, %error, "render failed; leaving fragment literal");
                failures.push(SpliceFailure {
                    index,
                    command: command.to_string(),
                    error: error.into(),
                });
            }
        }
    }

    let spliced = edits.len();
    let mut out = String::with_capacity(text.len());
    let mut last = 0usize;
    for (span, replacement) in edits {
        out.push_str(&text[last..span.start]);
        out.push_str(&replacement);
        last = span.end;
    }
    out.push_str(&text[last..]);

    SpliceReport {
        text: out,
        spliced,
        failures,
    }
}
