//! Bundled caption fonts.
//!
//! Font files placed in `assets/fonts/` are embedded at build time (see
//! `build.rs`) and exposed through a process-wide, read-only [`FontRegistry`].
//! The registry is built once on first use and shared by every worker thread.
//!
//! ## Lookup order
//!
//! ```text
//! <name>.ttf  →  <name>.ttc  →  <default>.ttf  →  FontError::Load
//! ```
//!
//! An empty name means the default font: [`DEFAULT_FONT`] when it is bundled,
//! otherwise the first bundled catalogue entry (see
//! [`FontRegistry::default_font`]). A load error is never fatal: the caption
//! engine downgrades to its geometric fallback.

use super::calculations::{Point, TextExtent};
use super::caption::TextFace;
use image::{Rgba, RgbaImage};
use rusttype::{Font, Scale, point};
use std::sync::LazyLock;
use thiserror::Error;

/// Fonts advertised by `--list-fonts`, in default-preference order.
pub const AVAILABLE_FONTS: &[&str] = &[
    "CourierPrime-Bold",
    "AmericanTypewriter",
    "BigBlueTermPlusNerdFont-Regular",
    "HeavyDataNerdFont-Regular",
    "DejaVuSansMono-Bold",
];

pub const DEFAULT_FONT: &str = AVAILABLE_FONTS[0];

/// `(stem, extension, bytes)` for every font file found by `build.rs`.
static EMBEDDED: &[(&str, &str, &[u8])] =
    include!(concat!(env!("OUT_DIR"), "/embedded_fonts.rs"));

static REGISTRY: LazyLock<FontRegistry> = LazyLock::new(|| {
    FontRegistry::from_assets(EMBEDDED.iter().filter_map(|&(name, ext, bytes)| {
        FontKind::from_extension(ext).map(|kind| FontAsset { name, kind, bytes })
    }))
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    #[error("could not load font '{name}': {reason}")]
    Load { name: String, reason: String },
    #[error("could not render caption: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    /// Single TrueType/OpenType face.
    Ttf,
    /// TrueType collection; the first face is used.
    Ttc,
}

impl FontKind {
    fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "ttf" => Some(Self::Ttf),
            "ttc" => Some(Self::Ttc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FontAsset {
    pub name: &'static str,
    pub kind: FontKind,
    pub bytes: &'static [u8],
}

/// Immutable name → font bytes table.
#[derive(Debug, Default)]
pub struct FontRegistry {
    assets: Vec<FontAsset>,
}

impl FontRegistry {
    /// The registry of fonts embedded in this binary.
    pub fn global() -> &'static FontRegistry {
        &REGISTRY
    }

    pub fn from_assets(assets: impl IntoIterator<Item = FontAsset>) -> Self {
        Self {
            assets: assets.into_iter().collect(),
        }
    }

    /// Whether any file was bundled under `name`.
    pub fn is_bundled(&self, name: &str) -> bool {
        self.get(name, FontKind::Ttf).is_some() || self.get(name, FontKind::Ttc).is_some()
    }

    fn get(&self, name: &str, kind: FontKind) -> Option<FontAsset> {
        self.assets
            .iter()
            .find(|asset| asset.name == name && asset.kind == kind)
            .copied()
    }

    /// The first catalogue font bundled as `.ttf`, or [`DEFAULT_FONT`] if
    /// none is.
    pub fn default_font(&self) -> &'static str {
        AVAILABLE_FONTS
            .iter()
            .copied()
            .find(|name| self.get(name, FontKind::Ttf).is_some())
            .unwrap_or(DEFAULT_FONT)
    }

    /// Find the asset for `name`, falling back to the default font.
    pub fn resolve(&self, name: &str) -> Result<FontAsset, FontError> {
        let default = self.default_font();
        let requested = if name.is_empty() { default } else { name };

        self.get(requested, FontKind::Ttf)
            .or_else(|| self.get(requested, FontKind::Ttc))
            .or_else(|| {
                if requested == default {
                    return None;
                }
                let fallback = self.get(default, FontKind::Ttf);
                if fallback.is_some() {
                    tracing::debug!("Font '{requested}' not bundled, using '{default}'");
                }
                fallback
            })
            .ok_or_else(|| FontError::Load {
                name: requested.to_string(),
                reason: format!("neither it nor the default '{default}' is bundled"),
            })
    }

    /// Resolve and parse a font.
    pub fn load(&self, name: &str) -> Result<Font<'static>, FontError> {
        let asset = self.resolve(name)?;
        let parsed = match asset.kind {
            FontKind::Ttf => Font::try_from_bytes(asset.bytes),
            FontKind::Ttc => Font::try_from_bytes_and_index(asset.bytes, 0),
        };
        parsed.ok_or_else(|| FontError::Load {
            name: asset.name.to_string(),
            reason: "font data could not be parsed".to_string(),
        })
    }
}

/// A parsed font at a fixed pixel size.
///
/// Sizes are em sizes at 72 DPI, so a 50px face has a 50px em and a 50px
/// line height.
pub struct RustTypeFace {
    font: Font<'static>,
    size_px: u32,
    scale: Scale,
}

impl RustTypeFace {
    pub fn new(font: Font<'static>, size_px: u32) -> Self {
        // rusttype scales by ascent-descent height; convert the em size.
        let v = font.v_metrics_unscaled();
        let units_per_em = f32::from(font.units_per_em().max(1));
        let height = size_px as f32 * (v.ascent - v.descent) / units_per_em;
        Self {
            font,
            size_px,
            scale: Scale::uniform(height),
        }
    }
}

impl TextFace for RustTypeFace {
    fn measure(&self, text: &str) -> TextExtent {
        let advance: f32 = text
            .chars()
            .map(|c| {
                self.font
                    .glyph(c)
                    .scaled(self.scale)
                    .h_metrics()
                    .advance_width
            })
            .sum();
        TextExtent {
            width: advance.ceil() as i64,
            line_height: self.size_px as i64,
        }
    }

    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        baseline: Point,
        color: Rgba<u8>,
    ) -> Result<(), FontError> {
        if self.size_px == 0 || !self.scale.y.is_finite() || self.scale.y <= 0.0 {
            return Err(FontError::Render(format!(
                "unusable font size {}px",
                self.size_px
            )));
        }

        let (width, height) = canvas.dimensions();
        let mut caret_x = baseline.x as f32;
        let baseline_y = baseline.y as f32;
        let mut previous = None;

        for c in text.chars() {
            let glyph = self.font.glyph(c).scaled(self.scale);
            let id = glyph.id();
            if let Some(prev) = previous {
                caret_x += self.font.pair_kerning(self.scale, prev, id);
            }
            let advance = glyph.h_metrics().advance_width;
            let positioned = glyph.positioned(point(caret_x, baseline_y));

            if let Some(bb) = positioned.pixel_bounding_box() {
                positioned.draw(|gx, gy, coverage| {
                    let px = gx as i32 + bb.min.x;
                    let py = gy as i32 + bb.min.y;
                    if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                        return;
                    }
                    blend(canvas.get_pixel_mut(px as u32, py as u32), color, coverage);
                });
            }

            caret_x += advance;
            previous = Some(id);
        }
        Ok(())
    }
}

/// Alpha-blend `color` over `dst` by glyph coverage.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * (color.0[3] as f32 / 255.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for i in 0..3 {
        dst.0[i] = (color.0[i] as f32 * alpha + dst.0[i] as f32 * inv).round() as u8;
    }
    dst.0[3] = 255;
}
