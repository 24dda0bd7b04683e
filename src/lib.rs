//! # Framer
//!
//! Frames JPEG photographs for print and social media. Each photo gets a
//! colored border, optional white padding and a one-line caption (explicit
//! text or the month and year it was taken).
//!
//! # Architecture: Per-File Pipeline
//!
//! Every file goes through the same self-contained pipeline; files share no
//! mutable state, so a batch is simply the pipeline mapped over the input:
//!
//! ```text
//! decode → caption text → compose frame → place + draw caption → encode
//!          (metadata)     (imaging)        (imaging)
//! ```
//!
//! The compositor reports where the photo landed on the canvas, and the
//! caption engine places text from that report alone. The two never look at
//! each other's internals.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`process`] | Batch driver: discovery, per-file pipeline, parallelism, failure policy |
//! | [`imaging`] | Frame geometry, compositing, fonts, caption layout and fallback rendering |
//! | [`metadata`] | Caption text: explicit value or EXIF capture date |
//! | [`config`] | `framer.toml` loading, layering over style defaults, validation |
//! | [`color`] | Hex color parsing |
//! | [`naming`] | JPEG detection and output file names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Two Border Styles
//!
//! - **Solid** grows the canvas around the untouched photo: border first,
//!   then white padding. The caption is centered in the bottom margin.
//! - **Instagram** always produces a 1080×1350 (4:5) canvas. The photo is
//!   scaled to fit a maximum size, padded, bordered and centered; the caption
//!   sits one line below the border.
//!
//! ## Captions Never Fail An Image
//!
//! Fonts are embedded at build time from `assets/fonts/`. If the requested
//! font (or the default) is missing, or drawing fails, a block-glyph fallback
//! draws an approximation of the caption instead. Missing or zero EXIF dates
//! produce a placeholder caption. Only decode and write errors skip a file.
//!
//! ## Pure-Rust Imaging
//!
//! JPEG decoding, resampling and encoding use the `image` crate; glyph
//! rasterization uses `rusttype`. The binary has no system dependencies.

pub mod color;
pub mod config;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
