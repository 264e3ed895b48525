//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// texsplice: render LaTeX fragments in chat messages to inline images.
///
/// Scans a message for `\command{snippet}` fragments, filters unsafe
/// directives, rasterizes the rest with latex/dvipng, and splices
/// `<img id="N">` tags into the text.
#[derive(Parser, Debug)]
#[command(name = "texsplice")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a message against the unsafe-directive denylist.
    Check {
        /// Message text; read from stdin when omitted.
        message: Option<String>,
    },

    /// Extract command/snippet fragment pairs from a message.
    Extract {
        /// Message text; read from stdin when omitted.
        message: Option<String>,
    },

    /// Run a full pipeline pass, rendering fragments with latex/dvipng.
    ///
    /// Requires `latex` and `dvipng` on PATH (or explicit --latex/--dvipng
    /// paths). Rendered images are written to the output directory.
    Render {
        /// Message text; read from stdin when omitted.
        message: Option<String>,

        /// Directory for rendered artifacts.
        #[arg(short, long, default_value = "artifacts")]
        out_dir: PathBuf,

        /// Foreground color as #RRGGBB (default black).
        #[arg(long)]
        fg: Option<String>,

        /// Background color as #RRGGBB (default white).
        #[arg(long)]
        bg: Option<String>,

        /// Rasterization resolution in DPI.
        #[arg(long)]
        dpi: Option<u32>,

        /// Explicit path to the latex executable.
        #[arg(long)]
        latex: Option<PathBuf>,

        /// Explicit path to the dvipng executable.
        #[arg(long)]
        dvipng: Option<PathBuf>,

        /// Treat the message as incoming (pre-display) rather than
        /// outgoing (pre-send).
        #[arg(long)]
        incoming: bool,
    },
}
