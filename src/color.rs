//! Hex color parsing.
//!
//! Border and caption colors arrive as 6-digit hex strings (`"#1a2b3c"` or
//! `"1a2b3c"`). They are parsed once during config resolution so a malformed
//! value is rejected before any image is touched.

use image::Rgba;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("invalid color '{0}': expected 6 hex digits, optionally prefixed with '#'")]
    InvalidColorFormat(String),
}

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parse `#rrggbb` or `rrggbb`.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidColorFormat(input.to_string());
        let hex = input.strip_prefix('#').unwrap_or(input);
        // from_str_radix tolerates a leading '+', so check digits up front.
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// The color as a fully opaque RGBA pixel.
    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }
}
