//! Render preferences: colors, resolution, and toolchain overrides.
//!
//! Color preferences come from the host as `#RRGGBB` strings and feed the
//! LaTeX template as decimal `R,G,B` triples. Unset (or unparseable)
//! preferences fall back to black-on-white.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// Default foreground color (black).
pub const DEFAULT_FOREGROUND: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Default background color (white).
pub const DEFAULT_BACKGROUND: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Default rasterization resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 150;

/// An RGB color triple.
///
/// Displays as decimal `R,G,B`, the form the LaTeX `\definecolor` template
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Rgb {
    /// Parses a `#RRGGBB` color string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColor`] unless the value is exactly a
    /// `#` followed by six hex digits.
    #[allow(clippy::cast_possible_truncation)]
    pub fn parse_hex(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor {
            value: value.to_string(),
        };

        let digits = value.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let rgb = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;

        Ok(Self {
            r: (rgb >> 16) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Render configuration supplied by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Foreground color preference as `#RRGGBB`; `None` means default.
    pub foreground: Option<String>,

    /// Background color preference as `#RRGGBB`; `None` means default.
    pub background: Option<String>,

    /// Rasterization resolution in DPI; `None` means [`DEFAULT_DPI`].
    pub dpi: Option<u32>,

    /// Explicit path to the `latex` executable, bypassing `PATH` search.
    pub latex: Option<PathBuf>,

    /// Explicit path to the `dvipng` executable, bypassing `PATH` search.
    pub dvipng: Option<PathBuf>,
}

impl RenderConfig {
    /// Resolves the foreground color.
    ///
    /// Unset falls back to [`DEFAULT_FOREGROUND`]; an unparseable value is
    /// logged and also falls back.
    #[must_use]
    pub fn foreground_rgb(&self) -> Rgb {
        resolve_color(self.foreground.as_deref(), DEFAULT_FOREGROUND, "foreground")
    }

    /// Resolves the background color.
    ///
    /// Unset falls back to [`DEFAULT_BACKGROUND`]; an unparseable value is
    /// logged and also falls back.
    #[must_use]
    pub fn background_rgb(&self) -> Rgb {
        resolve_color(self.background.as_deref(), DEFAULT_BACKGROUND, "background")
    }

    /// Resolves the rasterization resolution.
    #[must_use]
    pub fn dpi(&self) -> u32 {
        self.dpi.unwrap_or(DEFAULT_DPI)
    }
}

fn resolve_color(pref: Option<&str>, fallback: Rgb, role: &str) -> Rgb {
    match pref {
        None | Some("") => fallback,
        Some(value) => Rgb::parse_hex(value).unwrap_or_else(|err| {
            warn!(role, %err, "falling back to default color");
            fallback
        }),
    }
}
