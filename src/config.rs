//! Framing configuration.
//!
//! Settings come from three layers, highest priority first:
//!
//! ```text
//! command-line flags  >  framer.toml (--config)  >  style defaults
//! ```
//!
//! Both upper layers deserialize into the same sparse [`FramerConfig`] (every
//! field optional) and are merged with [`FramerConfig::merge`]. [`resolve`]
//! then fills the gaps with the defaults of the chosen border style and
//! validates everything, producing the [`Settings`] used for every image in
//! the batch. Malformed colors and thicknesses are rejected here, before any
//! image is opened.
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - style defaults apply to anything unset
//!
//! border_style = "solid"        # "solid" or "instagram" (unknown → solid)
//! border_thickness = 20         # pixels, or a percentage string like "10%"
//! border_color = "#000000"
//! padding = 150                 # white ring around the border
//! caption = ""                  # empty → derive from EXIF capture date
//! font_name = "CourierPrime-Bold"
//! font_size = 50                # pixels, or "auto" to derive from thickness
//! font_color = "#000000"
//! instagram_max_size = 1000     # longest side of the photo on the 1080×1350 canvas
//! quality = 100                 # JPEG quality (1-100)
//! max_processes = 4             # parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Style Defaults
//!
//! | | thickness | padding | font size | instagram max size |
//! |---|---|---|---|---|
//! | `instagram` | 5 | 0 | 20 | 1000 |
//! | `solid` | 20 | 150 | 50 | 900 |
//!
//! Unknown keys are rejected to catch typos early.

use crate::color::{Color, ColorError};
use crate::imaging::{BorderStyle, FontSize, INSTAGRAM_MAX_LIMIT, Quality, Thickness};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// A value that may be written as a bare number or a string
/// (`border_thickness = 20` and `border_thickness = "10%"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(u32),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Sparse, unvalidated settings from one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FramerConfig {
    pub border_style: Option<String>,
    pub border_thickness: Option<Scalar>,
    pub border_color: Option<String>,
    pub padding: Option<u32>,
    pub caption: Option<String>,
    pub font_name: Option<String>,
    pub font_size: Option<Scalar>,
    pub font_color: Option<String>,
    pub instagram_max_size: Option<u32>,
    pub quality: Option<u32>,
    pub max_processes: Option<usize>,
}

impl FramerConfig {
    /// Layer `overlay` on top of `self`; any value set in `overlay` wins.
    pub fn merge(self, overlay: FramerConfig) -> FramerConfig {
        FramerConfig {
            border_style: overlay.border_style.or(self.border_style),
            border_thickness: overlay.border_thickness.or(self.border_thickness),
            border_color: overlay.border_color.or(self.border_color),
            padding: overlay.padding.or(self.padding),
            caption: overlay.caption.or(self.caption),
            font_name: overlay.font_name.or(self.font_name),
            font_size: overlay.font_size.or(self.font_size),
            font_color: overlay.font_color.or(self.font_color),
            instagram_max_size: overlay.instagram_max_size.or(self.instagram_max_size),
            quality: overlay.quality.or(self.quality),
            max_processes: overlay.max_processes.or(self.max_processes),
        }
    }
}

/// Defaults that depend on the border style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDefaults {
    pub thickness: u32,
    pub padding: u32,
    pub font_size: u32,
    pub instagram_max_size: u32,
}

impl StyleDefaults {
    pub fn for_style(style: BorderStyle) -> Self {
        match style {
            BorderStyle::Instagram => Self {
                thickness: 5,
                padding: 0,
                font_size: 20,
                instagram_max_size: 1000,
            },
            BorderStyle::Solid => Self {
                thickness: 20,
                padding: 150,
                font_size: 50,
                instagram_max_size: 900,
            },
        }
    }
}

/// Fully resolved, validated settings for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub style: BorderStyle,
    pub thickness: Thickness,
    pub border_color: Color,
    pub padding: u32,
    /// Explicit caption; `None` derives it from the capture date.
    pub caption: Option<String>,
    /// Bundled font name; empty selects the default.
    pub font_name: String,
    pub font_size: FontSize,
    pub font_color: Color,
    pub instagram_max_size: u32,
    pub quality: Quality,
    pub max_processes: Option<usize>,
}

/// Apply style defaults to `config` and validate the result.
pub fn resolve(config: FramerConfig) -> Result<Settings, ConfigError> {
    let style = config
        .border_style
        .as_deref()
        .map(BorderStyle::parse_lenient)
        .unwrap_or_default();
    let defaults = StyleDefaults::for_style(style);

    let thickness = match config.border_thickness {
        None => Thickness::Pixels(defaults.thickness),
        Some(Scalar::Int(px)) => Thickness::Pixels(px),
        Some(Scalar::Text(text)) => text
            .parse()
            .map_err(|e| ConfigError::Validation(format!("border_thickness: {e}")))?,
    };

    let font_size = match config.font_size {
        None => FontSize::Pixels(defaults.font_size),
        Some(Scalar::Int(px)) => FontSize::Pixels(px),
        Some(Scalar::Text(text)) => text
            .parse()
            .map_err(|e| ConfigError::Validation(format!("font_size: {e}")))?,
    };

    let border_color = parse_color(config.border_color.as_deref())?;
    let font_color = parse_color(config.font_color.as_deref())?;

    let instagram_max_size = config
        .instagram_max_size
        .unwrap_or(defaults.instagram_max_size);
    let fits_canvas = (1..=INSTAGRAM_MAX_LIMIT).contains(&instagram_max_size);
    if style == BorderStyle::Instagram && !fits_canvas {
        return Err(ConfigError::Validation(format!(
            "instagram_max_size must be 1-{INSTAGRAM_MAX_LIMIT}, got {instagram_max_size}"
        )));
    }

    let quality = match config.quality {
        Some(q) if !(1..=100).contains(&q) => {
            return Err(ConfigError::Validation(format!(
                "quality must be 1-100, got {q}"
            )));
        }
        Some(q) => Quality::new(q),
        None => Quality::default(),
    };

    if config.max_processes == Some(0) {
        return Err(ConfigError::Validation(
            "max_processes must be at least 1".into(),
        ));
    }

    Ok(Settings {
        style,
        thickness,
        border_color,
        padding: config.padding.unwrap_or(defaults.padding),
        caption: config.caption.filter(|c| !c.is_empty()),
        font_name: config.font_name.unwrap_or_default(),
        font_size,
        font_color,
        instagram_max_size,
        quality,
        max_processes: config.max_processes,
    })
}

/// Colors default to black.
fn parse_color(value: Option<&str>) -> Result<Color, ConfigError> {
    match value {
        Some(hex) => Ok(Color::from_hex(hex)?),
        None => Ok(Color::BLACK),
    }
}

/// Load a config file.
pub fn load_config(path: &Path) -> Result<FramerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Resolve the effective thread count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(max_processes: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns a fully-commented stock `framer.toml`.
///
/// Used by `--gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Framer Configuration
# ====================
# Every option is optional. Command-line flags override this file; anything
# left unset falls back to the defaults of the chosen border style.

# "solid": border + white padding around the untouched photo.
# "instagram": photo scaled onto a fixed 1080x1350 white canvas.
# Unknown styles fall back to "solid".
border_style = "solid"

# Border width in pixels, or a percentage of the photo's shorter side ("10%").
# Default: 20 (solid), 5 (instagram)
# border_thickness = 20

# Border color as 6 hex digits.
border_color = "#000000"

# White ring outside the border (solid) or inside it (instagram), in pixels.
# Default: 150 (solid), 0 (instagram)
# padding = 150

# Caption text. Leave unset to use the EXIF capture date (" - JUN '23 -").
# caption = "Summer"

# Caption font. Run `framer --list-fonts` to see the bundled fonts.
# font_name = "CourierPrime-Bold"

# Caption size in pixels, or "auto" to derive it from the border thickness.
# Default: 50 (solid), 20 (instagram)
# font_size = 50

font_color = "#000000"

# Longest side of the photo on the instagram canvas (1-1080).
# Default: 1000 (instagram), 900 (solid, unused)
# instagram_max_size = 1000

# JPEG output quality (1-100).
quality = 100

# Maximum parallel workers. Omit for one per CPU core.
# max_processes = 4
"##
}
