//! Pure layout arithmetic for frames and captions.
//!
//! All functions here are pure and testable without any I/O or pixels. Every
//! division is integer division truncating toward zero, so odd remainders land
//! on the top-left side and caption anchors may go negative when the text is
//! wider than the content it is centered under.

use super::params::Thickness;

/// Fixed output canvas of the Instagram style (4:5 portrait).
pub const INSTAGRAM_CANVAS: Dimensions = Dimensions {
    width: 1080,
    height: 1350,
};

/// Largest accepted `instagram_max_size`: the photo must fit the canvas width.
pub const INSTAGRAM_MAX_LIMIT: u32 = INSTAGRAM_CANVAS.width;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    /// Grow by `ring` pixels on every side.
    pub fn grow(self, ring: u32) -> Self {
        Self {
            width: self.width + 2 * ring,
            height: self.height + 2 * ring,
        }
    }
}

/// Canvas coordinate. Signed because centering a block larger than its
/// container yields a negative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i64, dy: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Resolve a thickness setting against the source image.
///
/// Percentages apply to the *shorter* side and truncate to whole pixels:
/// `10%` of a 1000×1500 image is 100px.
pub fn resolve_thickness(thickness: Thickness, source: Dimensions) -> u32 {
    match thickness {
        Thickness::Pixels(px) => px,
        Thickness::Percent(pct) => (source.min_side() as f64 * (pct / 100.0)) as u32,
    }
}

/// Derive a caption font size from the border thickness.
///
/// Thin borders get proportionally smaller text:
/// `< 40px → 50%`, `< 80px → 70%`, otherwise `90%` (truncated).
pub fn derive_font_size(thickness: u32) -> u32 {
    let factor = if thickness < 40 {
        0.5
    } else if thickness < 80 {
        0.7
    } else {
        0.9
    };
    (thickness as f64 * factor) as u32
}

/// Canvas size of a solid frame: photo + border ring + padding ring.
pub fn solid_canvas_size(source: Dimensions, thickness: u32, padding: u32) -> Dimensions {
    source.grow(thickness).grow(padding)
}

/// Uniformly scale `source` so neither side exceeds `max_size`.
///
/// `scale = min(max/w, max/h)` is applied to both sides and floored. Small
/// images are scaled *up*. Each side is kept at least one pixel.
pub fn fit_within(source: Dimensions, max_size: u32) -> Dimensions {
    let scale_w = max_size as f64 / source.width as f64;
    let scale_h = max_size as f64 / source.height as f64;
    let scale = scale_w.min(scale_h);

    Dimensions {
        width: ((source.width as f64 * scale) as u32).max(1),
        height: ((source.height as f64 * scale) as u32).max(1),
    }
}

/// Offset that centers `inner` inside `outer`, truncating toward zero.
pub fn center_offset(outer: Dimensions, inner: Dimensions) -> Point {
    Point {
        x: (outer.width as i64 - inner.width as i64) / 2,
        y: (outer.height as i64 - inner.height as i64) / 2,
    }
}

/// Every rectangle involved in an Instagram frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstagramLayout {
    /// Photo after scaling, before padding.
    pub scaled: Dimensions,
    /// Scaled photo plus its white padding ring. This is the size reported
    /// to the caption engine.
    pub content: Dimensions,
    /// Content plus border ring.
    pub block: Dimensions,
    /// Top-left of the bordered block on the canvas.
    pub block_origin: Point,
    /// `block_origin + thickness + padding`.
    pub content_origin: Point,
}

pub fn instagram_layout(
    source: Dimensions,
    max_size: u32,
    thickness: u32,
    padding: u32,
) -> InstagramLayout {
    let scaled = fit_within(source, max_size);
    let content = scaled.grow(padding);
    let block = content.grow(thickness);
    let block_origin = center_offset(INSTAGRAM_CANVAS, block);
    let inset = thickness as i64 + padding as i64;

    InstagramLayout {
        scaled,
        content,
        block,
        block_origin,
        content_origin: block_origin.offset(inset, inset),
    }
}

/// Measured (or approximated) caption extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: i64,
    pub line_height: i64,
}

/// Compute where the caption is drawn.
///
/// With a `content_origin` (Instagram) the text is centered under the content
/// and its baseline sits one line below the border. Without one (Solid) the
/// photo starts at `thickness + padding` and the text is centered in the
/// bottom margin band.
pub fn caption_anchor(
    text: TextExtent,
    content: Dimensions,
    thickness: u32,
    padding: u32,
    content_origin: Option<Point>,
) -> Point {
    let content_w = content.width as i64;
    let content_h = content.height as i64;
    let thickness = thickness as i64;

    match content_origin {
        Some(origin) => Point {
            x: origin.x + (content_w - text.width) / 2,
            y: origin.y + content_h + thickness + text.line_height,
        },
        None => {
            let margin = thickness + padding as i64;
            Point {
                x: margin + (content_w - text.width) / 2,
                y: margin + content_h + (margin - text.line_height) / 2 + text.line_height,
            }
        }
    }
}
