//! Framing and captioning: pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Border / padding rings** | `image::imageops::replace` onto a filled `RgbaImage` |
//! | **Instagram scale** | `image::imageops::resize` with `Lanczos3` |
//! | **Caption text** | `rusttype` glyph layout + coverage blending |
//! | **Caption fallback** | block glyphs drawn directly into the canvas |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for frame and caption geometry (unit testable)
//! - **Parameters**: Value types parsed from user input
//! - **Compose**: [`compose`] builds the framed canvas
//! - **Fonts**: the embedded [`FontRegistry`] and the `rusttype` face
//! - **Caption**: [`draw_caption`] places and draws the caption, with fallback

pub mod calculations;
pub mod caption;
pub mod compose;
pub mod fonts;
mod params;

pub use calculations::{Dimensions, INSTAGRAM_MAX_LIMIT, Point};
pub use caption::{CaptionPlacement, CaptionRender, CaptionSpec, TextFace, draw_caption};
pub use compose::{Composition, FrameParams, compose};
pub use fonts::{AVAILABLE_FONTS, DEFAULT_FONT, FontError, FontRegistry};
pub use params::{BorderStyle, FontSize, ParseThicknessError, Quality, Thickness};
