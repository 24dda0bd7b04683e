//! Parameter types for framing operations.
//!
//! These describe *what* frame to build, not *how*. The string forms accepted
//! on the command line and in `framer.toml` are parsed here so the rest of the
//! pipeline only ever sees validated values.
//!
//! ## Types
//!
//! - [`BorderStyle`]: Solid frame or fixed 1080×1350 Instagram canvas.
//! - [`Thickness`]: Border width in pixels or as a percentage of the shorter side.
//! - [`FontSize`]: Explicit caption size or derived from the border thickness.
//! - [`Quality`]: JPEG encoding quality (1–100, default 100). Clamped on construction.

use std::fmt;
use std::str::FromStr;

/// Frame layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// Border (and optional white padding) grown around the untouched photo.
    #[default]
    Solid,
    /// Photo scaled into a fixed 4:5 white canvas.
    Instagram,
}

impl BorderStyle {
    /// Parse a user-supplied style name, case-insensitively.
    ///
    /// Unrecognized names fall back to [`BorderStyle::Solid`] with a warning.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "solid" => Self::Solid,
            "instagram" => Self::Instagram,
            other => {
                tracing::warn!("Unknown border style '{other}'. Using solid border.");
                Self::Solid
            }
        }
    }

    /// Suffix appended to the source stem when naming the output file.
    pub fn output_suffix(self) -> &'static str {
        match self {
            Self::Solid => "_framed",
            Self::Instagram => "_instagram",
        }
    }
}

impl fmt::Display for BorderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid => f.write_str("solid"),
            Self::Instagram => f.write_str("instagram"),
        }
    }
}

/// Border thickness before it is resolved against a concrete image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Thickness {
    Pixels(u32),
    /// Percentage of the source image's shorter side.
    Percent(f64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseThicknessError(pub String);

impl fmt::Display for ParseThicknessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid border thickness '{}': expected pixels (e.g. 20) or a percentage (e.g. 10%)",
            self.0
        )
    }
}

impl std::error::Error for ParseThicknessError {}

impl FromStr for Thickness {
    type Err = ParseThicknessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseThicknessError(s.to_string());
        let trimmed = s.trim();
        match trimmed.strip_suffix('%') {
            Some(pct) => {
                let value: f64 = pct.trim().parse().map_err(|_| err())?;
                if !value.is_finite() || value < 0.0 {
                    return Err(err());
                }
                Ok(Self::Percent(value))
            }
            None => trimmed.parse::<u32>().map(Self::Pixels).map_err(|_| err()),
        }
    }
}

impl fmt::Display for Thickness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}"),
            Self::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

/// Caption font size setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Pixels(u32),
    /// Derive from the resolved border thickness.
    Auto,
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        trimmed
            .parse::<u32>()
            .map(Self::Pixels)
            .map_err(|_| format!("invalid font size '{s}': expected pixels or 'auto'"))
    }
}

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(100)
    }
}
