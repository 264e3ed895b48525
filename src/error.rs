//! Error types for texsplice operations.
//!
//! This module provides the error hierarchy using `thiserror` for all
//! pipeline stages: extraction, rendering, configuration, and CLI commands.

use thiserror::Error;

/// Result type alias for texsplice operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for texsplice operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Fragment extraction errors (command/snippet scanning).
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),

    /// Rendering errors (external toolchain, artifact store).
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration errors.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// CLI command errors.
    #[error("command error: {0}")]
    Command(#[from] CommandError),
}

/// Errors produced by the fragment extractor.
///
/// Any of these aborts the whole pipeline pass for the affected message:
/// the original text is passed through unmodified rather than partially
/// substituted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Command and snippet scans produced sequences of different lengths.
    #[error("found {commands} commands but {snippets} brace groups")]
    CountMismatch {
        /// Number of commands found.
        commands: usize,
        /// Number of brace groups found.
        snippets: usize,
    },

    /// A brace group was opened but never closed.
    #[error("unterminated brace group opened at byte offset {offset}")]
    UnterminatedGroup {
        /// Byte offset of the opening brace.
        offset: usize,
    },
}

/// Errors produced by the rendering collaborator.
///
/// These are recovered per-fragment: the affected occurrence is left as
/// literal source text and the pipeline continues.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A required executable was not found on `PATH`.
    #[error("toolchain executable not found: {tool}")]
    ToolchainMissing {
        /// Name of the missing executable.
        tool: String,
    },

    /// A toolchain subprocess exited unsuccessfully.
    #[error("{tool} failed: {detail}")]
    ToolchainFailed {
        /// Name of the failed executable.
        tool: String,
        /// Exit status or failure description.
        detail: String,
    },

    /// The toolchain ran but produced no output image.
    #[error("expected output image missing: {path}")]
    OutputMissing {
        /// Path that should have contained the image.
        path: String,
    },

    /// The host artifact store refused the rendered image.
    #[error("artifact store rejected the rendered image")]
    StoreRejected,

    /// I/O failure while driving the toolchain.
    #[error("render I/O error: {0}")]
    Io(String),
}

/// Error raised for a single fragment during splicing.
#[derive(Error, Debug)]
pub enum FragmentError {
    /// The fragment's literal source text could not be located in the
    /// buffer at or after its expected position.
    #[error("fragment source text not found in buffer")]
    NotLocated,

    /// Rendering the fragment failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A color preference string is not of the form `#RRGGBB`.
    #[error("invalid color string: {value} (expected #RRGGBB)")]
    InvalidColor {
        /// The offending color string.
        value: String,
    },
}

/// CLI command errors.
#[derive(Error, Debug)]
pub enum CommandError {
    /// Invalid argument provided.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to read message input.
    #[error("failed to read input: {0}")]
    ReadInput(String),

    /// Failed to write a rendered artifact to disk.
    #[error("failed to write artifact: {path}: {reason}")]
    WriteArtifact {
        /// Destination path.
        path: String,
        /// Reason for failure.
        reason: String,
    },
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
