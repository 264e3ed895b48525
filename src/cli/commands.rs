//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    OutputFormat, WrittenArtifact, format_check, format_extraction, format_render,
};
use crate::cli::parser::{Cli, Commands};
use crate::config::RenderConfig;
use crate::denylist::is_denylisted;
use crate::error::{CommandError, Result};
use crate::extract::extract;
use crate::pipeline::Pipeline;
use crate::render::{MemoryStore, Toolchain, ToolchainRenderer};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Check { message } => {
            let message = resolve_message(message.as_deref())?;
            Ok(format_check(is_denylisted(&message), format))
        }
        Commands::Extract { message } => {
            let message = resolve_message(message.as_deref())?;
            let extraction = extract(&message)?;
            Ok(format_extraction(&extraction, format))
        }
        Commands::Render {
            message,
            out_dir,
            fg,
            bg,
            dpi,
            latex,
            dvipng,
            incoming,
        } => {
            let message = resolve_message(message.as_deref())?;
            let config = RenderConfig {
                foreground: fg.clone(),
                background: bg.clone(),
                dpi: *dpi,
                latex: latex.clone(),
                dvipng: dvipng.clone(),
            };
            cmd_render(&message, &config, out_dir, *incoming, format)
        }
    }
}

/// Takes the message from the argument, or reads it from stdin.
fn resolve_message(arg: Option<&str>) -> Result<String> {
    if let Some(message) = arg {
        return Ok(message.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| CommandError::ReadInput(e.to_string()))?;
    Ok(buffer.trim_end_matches('\n').to_string())
}

fn cmd_render(
    message: &str,
    config: &RenderConfig,
    out_dir: &Path,
    incoming: bool,
    format: OutputFormat,
) -> Result<String> {
    let toolchain = Toolchain::from_config(config)?;
    let mut pipeline = Pipeline::new(ToolchainRenderer::new(toolchain, MemoryStore::new()));

    let outcome = if incoming {
        pipeline.transform_incoming(message)
    } else {
        pipeline.transform_outgoing(message)
    };

    let store = pipeline.into_renderer().into_store();
    let artifacts = write_artifacts(&store, out_dir)?;

    Ok(format_render(message, &outcome, &artifacts, format))
}

/// Persists rendered images to the output directory.
///
/// The directory is only created when there is something to write.
fn write_artifacts(store: &MemoryStore, out_dir: &Path) -> Result<Vec<WrittenArtifact>> {
    if store.is_empty() {
        return Ok(Vec::new());
    }

    fs::create_dir_all(out_dir).map_err(|e| CommandError::WriteArtifact {
        path: out_dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut written = Vec::with_capacity(store.len());
    for artifact in store.artifacts() {
        let path: PathBuf = out_dir.join(&artifact.name);
        fs::write(&path, &artifact.bytes).map_err(|e| CommandError::WriteArtifact {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        written.push(WrittenArtifact {
            id: artifact.id.get(),
            path: path.display().to_string(),
        });
    }
    Ok(written)
}
