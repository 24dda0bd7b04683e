//! Frame compositing.
//!
//! Builds the framed canvas for a decoded photo and reports where the photo
//! ended up, which the caption engine needs to place its text.
//!
//! ```text
//! Solid                              Instagram (1080×1350, white)
//! ┌──────────── padding (white) ┐    ┌──────────────────────────┐
//! │ ┌────────── border ───────┐ │    │   ┌──── border ─────┐    │
//! │ │ photo (original size)   │ │    │   │ padding (white) │    │
//! │ └─────────────────────────┘ │    │   │  scaled photo   │    │
//! │         caption             │    │   └─────────────────┘    │
//! └─────────────────────────────┘    │        caption           │
//!                                    └──────────────────────────┘
//! ```

use super::calculations::{
    Dimensions, INSTAGRAM_CANVAS, Point, instagram_layout, solid_canvas_size,
};
use super::caption::CaptionPlacement;
use super::params::BorderStyle;
use crate::color::Color;
use image::RgbaImage;
use image::imageops::{self, FilterType};

/// Resolved frame settings for one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    pub style: BorderStyle,
    /// Border width in pixels, already resolved against this image.
    pub thickness: u32,
    pub color: Color,
    pub padding: u32,
    /// Longest side of the scaled photo (Instagram only).
    pub instagram_max_size: u32,
}

/// A framed canvas plus the geometry the caption engine needs.
#[derive(Debug, Clone)]
pub struct Composition {
    pub canvas: RgbaImage,
    /// Photo size on the canvas: unchanged for Solid, scaled and padded for
    /// Instagram.
    pub content_size: Dimensions,
    /// Top-left of the content area. Only Instagram reports one; Solid
    /// captions are placed from the border and padding widths alone.
    pub content_origin: Option<Point>,
    pub thickness: u32,
    pub padding: u32,
}

impl Composition {
    pub fn caption_placement(&self) -> CaptionPlacement {
        CaptionPlacement {
            content_size: self.content_size,
            thickness: self.thickness,
            padding: self.padding,
            content_origin: self.content_origin,
        }
    }
}

/// Frame `image` according to `params`.
pub fn compose(image: &RgbaImage, params: &FrameParams) -> Composition {
    match params.style {
        BorderStyle::Solid => compose_solid(image, params),
        BorderStyle::Instagram => compose_instagram(image, params),
    }
}

fn dimensions_of(image: &RgbaImage) -> Dimensions {
    let (width, height) = image.dimensions();
    Dimensions { width, height }
}

/// Surround `inner` with a `ring`-pixel band of `color`.
fn surround(inner: &RgbaImage, ring: u32, color: Color) -> RgbaImage {
    let size = dimensions_of(inner).grow(ring);
    let mut out = RgbaImage::from_pixel(size.width, size.height, color.to_rgba());
    imageops::replace(&mut out, inner, ring as i64, ring as i64);
    out
}

fn compose_solid(image: &RgbaImage, params: &FrameParams) -> Composition {
    let bordered = surround(image, params.thickness, params.color);
    let canvas = if params.padding > 0 {
        surround(&bordered, params.padding, Color::WHITE)
    } else {
        bordered
    };
    debug_assert_eq!(
        dimensions_of(&canvas),
        solid_canvas_size(dimensions_of(image), params.thickness, params.padding)
    );

    Composition {
        canvas,
        content_size: dimensions_of(image),
        content_origin: None,
        thickness: params.thickness,
        padding: params.padding,
    }
}

fn compose_instagram(image: &RgbaImage, params: &FrameParams) -> Composition {
    let layout = instagram_layout(
        dimensions_of(image),
        params.instagram_max_size,
        params.thickness,
        params.padding,
    );

    let scaled = imageops::resize(
        image,
        layout.scaled.width,
        layout.scaled.height,
        FilterType::Lanczos3,
    );
    let content = if params.padding > 0 {
        surround(&scaled, params.padding, Color::WHITE)
    } else {
        scaled
    };
    let block = surround(&content, params.thickness, params.color);

    let mut canvas = RgbaImage::from_pixel(
        INSTAGRAM_CANVAS.width,
        INSTAGRAM_CANVAS.height,
        Color::WHITE.to_rgba(),
    );
    imageops::replace(
        &mut canvas,
        &block,
        layout.block_origin.x,
        layout.block_origin.y,
    );

    Composition {
        canvas,
        content_size: layout.content,
        content_origin: Some(layout.content_origin),
        thickness: params.thickness,
        padding: params.padding,
    }
}
