//! Caption layout and rendering.
//!
//! A caption is placed relative to the geometry reported by the compositor
//! (see [`caption_anchor`]) and drawn with a bundled font. When no font can be
//! loaded, or drawing fails, the caption is drawn by a geometric fallback that
//! approximates each character with a block. A caption problem is never fatal
//! for the image it belongs to.
//!
//! The fallback's fixed `size/2` cell width does not match real glyph
//! advances, so the same caption is centered slightly differently on the two
//! paths.

use super::calculations::{Dimensions, Point, TextExtent, caption_anchor};
use super::fonts::{FontError, FontRegistry, RustTypeFace};
use crate::color::Color;
use image::{Rgba, RgbaImage};

/// Anything that can measure and draw a line of text.
pub trait TextFace {
    /// Advance width of `text` and the face's line height, in whole pixels.
    fn measure(&self, text: &str) -> TextExtent;

    /// Draw `text` with its baseline starting at `baseline`.
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        baseline: Point,
        color: Rgba<u8>,
    ) -> Result<(), FontError>;
}

/// What to write.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionSpec<'a> {
    pub text: &'a str,
    pub font_size: u32,
    pub color: Color,
    /// Bundled font name; empty selects the default.
    pub font_name: &'a str,
}

/// Where the photo sits on the canvas, as reported by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionPlacement {
    pub content_size: Dimensions,
    pub thickness: u32,
    pub padding: u32,
    pub content_origin: Option<Point>,
}

impl CaptionPlacement {
    fn anchor(&self, extent: TextExtent) -> Point {
        caption_anchor(
            extent,
            self.content_size,
            self.thickness,
            self.padding,
            self.content_origin,
        )
    }
}

/// Which renderer ended up drawing the caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionRender {
    Font,
    Fallback,
}

/// Draw a caption with a font from `registry`, degrading to the fallback.
pub fn draw_caption(
    canvas: &mut RgbaImage,
    caption: &CaptionSpec<'_>,
    placement: &CaptionPlacement,
    registry: &FontRegistry,
) -> CaptionRender {
    match registry.load(caption.font_name) {
        Ok(font) => {
            let face = RustTypeFace::new(font, caption.font_size);
            draw_with_face(canvas, caption, placement, &face)
        }
        Err(e) => {
            tracing::warn!("{e}. Using fallback caption renderer.");
            draw_fallback(canvas, caption, placement);
            CaptionRender::Fallback
        }
    }
}

/// Measure, place and draw with `face`; a draw error switches to the fallback.
pub fn draw_with_face(
    canvas: &mut RgbaImage,
    caption: &CaptionSpec<'_>,
    placement: &CaptionPlacement,
    face: &dyn TextFace,
) -> CaptionRender {
    let extent = face.measure(caption.text);
    let anchor = placement.anchor(extent);

    match face.draw(canvas, caption.text, anchor, caption.color.to_rgba()) {
        Ok(()) => CaptionRender::Font,
        Err(e) => {
            tracing::warn!("{e}. Using fallback caption renderer.");
            draw_fallback(canvas, caption, placement);
            CaptionRender::Fallback
        }
    }
}

/// Block-glyph renderer that needs no font.
///
/// Every character occupies a `font_size / 2` cell; the anchor's y is the
/// vertical middle of the glyphs. Spaces are skipped, `-` is a 5px bar,
/// `'` a short tick in the upper third, anything else a solid block 80% of
/// the cell wide.
pub fn draw_fallback(
    canvas: &mut RgbaImage,
    caption: &CaptionSpec<'_>,
    placement: &CaptionPlacement,
) {
    let cell = (caption.font_size / 2) as i64;
    let glyph_h = caption.font_size as i64;
    let glyph_w = (cell as f64 * 0.8) as i64;
    let extent = TextExtent {
        width: caption.text.chars().count() as i64 * cell,
        line_height: glyph_h,
    };
    let anchor = placement.anchor(extent);
    let color = caption.color.to_rgba();

    for (i, c) in caption.text.chars().enumerate() {
        let x = anchor.x + i as i64 * cell;
        match c {
            ' ' => {}
            '-' => fill_rect(canvas, x, anchor.y - 2, glyph_w, 5, color),
            '\'' => {
                let left = glyph_w / 3;
                let right = 2 * glyph_w / 3;
                fill_rect(
                    canvas,
                    x + left,
                    anchor.y - glyph_h / 2,
                    right - left,
                    glyph_h / 3,
                    color,
                );
            }
            _ => fill_rect(canvas, x, anchor.y - glyph_h / 2, glyph_w, glyph_h, color),
        }
    }
}

/// Paint a rectangle, clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
    let (cw, ch) = canvas.dimensions();
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(cw as i64);
    let y1 = (y + h).min(ch as i64);

    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}
