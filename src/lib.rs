//! # texsplice
//!
//! Renders LaTeX fragments embedded in chat messages to inline images.
//!
//! texsplice scans a message for `\command{snippet}` fragments, filters
//! unsafe directives against a fixed denylist, rasterizes each surviving
//! fragment through an external LaTeX/dvipng toolchain, and splices
//! `<img id="N">` reference tags back into the message in place of the
//! original markup.
//!
//! ## Features
//!
//! - **Denylist filtering**: 42 forbidden directives, matched literally
//!   and as `\begin{...}` environments
//! - **Aligned extraction**: command and snippet scans whose outputs must
//!   correlate index-for-index, with fail-closed mismatch handling
//! - **Positionally-correct splicing**: each fragment replaces its own
//!   physical occurrence, applied as one edit pass over the buffer
//! - **Graceful degradation**: render failures leave single fragments as
//!   literal text; the original message is always the safe fallback

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![warn(unsafe_code)]

pub mod cli;
pub mod config;
pub mod denylist;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod render;
pub mod splice;

// Re-export commonly used types at crate root
pub use error::{Error, ExtractError, FragmentError, RenderError, Result};

// Re-export pipeline types
pub use pipeline::{Direction, PassOutcome, Pipeline, SkipReason};

// Re-export validation and extraction entry points
pub use denylist::{DENYLIST, is_denylisted};
pub use extract::{Extraction, extract};

// Re-export splicing types
pub use splice::{ArtifactId, Render, SpliceFailure, SpliceReport, image_tag, splice};

// Re-export render collaborator types
pub use config::{RenderConfig, Rgb};
pub use render::{ArtifactStore, MemoryStore, Toolchain, ToolchainRenderer};

// Re-export CLI types
pub use cli::{Cli, Commands, OutputFormat};
