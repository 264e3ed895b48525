//! LaTeX/dvipng toolchain driver.
//!
//! Rasterizes one fragment at a time: the fragment source is wrapped in a
//! minimal math document, compiled with `latex` in a private temp
//! directory, and the resulting DVI is converted to a tightly-cropped PNG
//! with `dvipng`. Both executables are discovered on `PATH` unless the
//! config names them explicitly.
//!
//! Each call blocks until the subprocesses finish; no timeout is applied
//! here.

use crate::config::{RenderConfig, Rgb};
use crate::error::RenderError;
use crate::render::store::ArtifactStore;
use crate::splice::{ArtifactId, Render};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

const TEX_FILE: &str = "fragment.tex";
const DVI_FILE: &str = "fragment.dvi";
const PNG_FILE: &str = "fragment.png";

// Document template, split where the color triples are injected.
const HEADER: &str = "\\documentclass[12pt]{article}\\usepackage{color}\
    \\usepackage[dvips]{graphicx}\\usepackage{amsmath}\\usepackage{amssymb}\
    \\pagestyle{empty}\\definecolor{fgcolor}{RGB}{";
const HEADER_COLOR: &str = "}\\definecolor{bgcolor}{RGB}{";
const HEADER_MATH: &str =
    "}\\begin{document}\\pagecolor{bgcolor}\\begin{gather*}\\color{fgcolor}";
const FOOTER_MATH: &str = "\\end{gather*}";
const FOOTER: &str = "\\end{document}";

/// Wraps fragment source in a complete one-formula LaTeX document.
///
/// The foreground and background colors are injected as decimal `R,G,B`
/// triples into `\definecolor` declarations.
#[must_use]
pub fn wrap_document(source: &str, foreground: Rgb, background: Rgb) -> String {
    let mut doc = String::with_capacity(
        HEADER.len() + HEADER_COLOR.len() + HEADER_MATH.len() + source.len() + 64,
    );
    doc.push_str(HEADER);
    doc.push_str(&foreground.to_string());
    doc.push_str(HEADER_COLOR);
    doc.push_str(&background.to_string());
    doc.push_str(HEADER_MATH);
    doc.push_str(source);
    doc.push_str(FOOTER_MATH);
    doc.push_str(FOOTER);
    doc
}

/// Searches `PATH` for an executable, honoring the platform suffix.
#[must_use]
pub fn search_path(name: &str) -> Option<PathBuf> {
    let file_name = format!("{name}{}", std::env::consts::EXE_SUFFIX);
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(&file_name))
        .find(|candidate| candidate.is_file())
}

/// Resolved typesetting toolchain.
#[derive(Debug, Clone)]
pub struct Toolchain {
    latex: PathBuf,
    dvipng: PathBuf,
    foreground: Rgb,
    background: Rgb,
    dpi: u32,
}

impl Toolchain {
    /// Resolves the toolchain from config, searching `PATH` for any
    /// executable the config does not name explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::ToolchainMissing`] if `latex` or `dvipng`
    /// cannot be found.
    pub fn from_config(config: &RenderConfig) -> Result<Self, RenderError> {
        let latex = resolve_tool(config.latex.as_deref(), "latex")?;
        let dvipng = resolve_tool(config.dvipng.as_deref(), "dvipng")?;

        Ok(Self {
            latex,
            dvipng,
            foreground: config.foreground_rgb(),
            background: config.background_rgb(),
            dpi: config.dpi(),
        })
    }

    /// Rasterizes one fragment's source text to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`RenderError`] if scratch-space setup, either
    /// subprocess, or reading the output image fails.
    pub fn rasterize(&self, source: &str) -> Result<Vec<u8>, RenderError> {
        let dir = tempfile::tempdir()?;
        let work = dir.path();
        debug!(?work, source, "rasterizing fragment");

        fs::write(
            work.join(TEX_FILE),
            wrap_document(source, self.foreground, self.background),
        )?;

        run_tool(
            &self.latex,
            work,
            &[
                "-interaction=nonstopmode".to_string(),
                "-halt-on-error".to_string(),
                TEX_FILE.to_string(),
            ],
        )?;

        run_tool(
            &self.dvipng,
            work,
            &[
                "-q".to_string(),
                "-T".to_string(),
                "tight".to_string(),
                "-D".to_string(),
                self.dpi.to_string(),
                "-o".to_string(),
                PNG_FILE.to_string(),
                DVI_FILE.to_string(),
            ],
        )?;

        let png_path = work.join(PNG_FILE);
        if !png_path.is_file() {
            return Err(RenderError::OutputMissing {
                path: png_path.display().to_string(),
            });
        }
        Ok(fs::read(png_path)?)
    }
}

fn resolve_tool(explicit: Option<&Path>, name: &str) -> Result<PathBuf, RenderError> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(RenderError::ToolchainMissing {
            tool: path.display().to_string(),
        });
    }
    search_path(name).ok_or_else(|| RenderError::ToolchainMissing {
        tool: name.to_string(),
    })
}

fn run_tool(program: &Path, work_dir: &Path, args: &[String]) -> Result<(), RenderError> {
    let tool = program
        .file_name()
        .map_or_else(|| program.display().to_string(), |n| n.to_string_lossy().into_owned());

    let output = Command::new(program)
        .args(args)
        .current_dir(work_dir)
        .output()
        .map_err(|e| RenderError::ToolchainFailed {
            tool: tool.clone(),
            detail: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = if stderr.trim().is_empty() {
            output.status.to_string()
        } else {
            format!("{}: {}", output.status, stderr.trim())
        };
        return Err(RenderError::ToolchainFailed { tool, detail });
    }

    Ok(())
}

/// [`Render`] implementation combining the toolchain with an artifact store.
///
/// Each successful rasterization is registered with the store under a
/// sequential `formula-N.png` name; the store's id is what ends up in the
/// message buffer.
#[derive(Debug)]
pub struct ToolchainRenderer<S> {
    toolchain: Toolchain,
    store: S,
    sequence: usize,
}

impl<S: ArtifactStore> ToolchainRenderer<S> {
    /// Creates a renderer over a resolved toolchain and a store.
    #[must_use]
    pub const fn new(toolchain: Toolchain, store: S) -> Self {
        Self {
            toolchain,
            store,
            sequence: 0,
        }
    }

    /// Returns a reference to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the renderer, returning the store and its artifacts.
    pub fn into_store(self) -> S {
        self.store
    }
}

impl<S: ArtifactStore> Render for ToolchainRenderer<S> {
    fn render(&mut self, command: &str, snippet: &str) -> Result<ArtifactId, RenderError> {
        let source = format!("\\{command}{{{snippet}}}");
        let png = self.toolchain.rasterize(&source)?;

        self.sequence += 1;
        let name = format!("formula-{}.png", self.sequence);
        self.store.store(&name, png)
    }
}
