//! Shared test utilities for the framer test suite.
//!
//! Synthetic JPEGs (optionally carrying a hand-built EXIF block) so tests do
//! not depend on binary fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! write_jpeg(&tmp.path().join("a.jpg"), 64, 48);
//!
//! let bytes = jpeg_with_exif(8, 8, ExifDate::Original("2023:06:15 10:30:00"));
//! ```

use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;

// =========================================================================
// JPEG fixtures
// =========================================================================

/// Encode a gradient image as JPEG.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut out = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut out)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

/// Write a gradient JPEG to `path`.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

// =========================================================================
// EXIF
// =========================================================================

/// Which date tag to embed.
#[derive(Debug, Clone, Copy)]
pub enum ExifDate<'a> {
    /// `DateTimeOriginal` (0x9003) in the Exif sub-IFD.
    Original(&'a str),
    /// `DateTime` (0x0132) directly in IFD0.
    Modified(&'a str),
}

/// A JPEG with an APP1 EXIF segment carrying one date tag.
pub fn jpeg_with_exif(width: u32, height: u32, date: ExifDate<'_>) -> Vec<u8> {
    let jpeg = jpeg_bytes(width, height);
    let tiff = tiff_with_date(date);

    let mut app1 = vec![0xFF, 0xE1];
    let len = (2 + 6 + tiff.len()) as u16;
    app1.extend_from_slice(&len.to_be_bytes());
    app1.extend_from_slice(b"Exif\0\0");
    app1.extend_from_slice(&tiff);

    // Insert right after SOI.
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&app1);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Little-endian TIFF structure with the date either in IFD0 or behind an
/// Exif IFD pointer.
fn tiff_with_date(date: ExifDate<'_>) -> Vec<u8> {
    const ASCII: u16 = 2;
    const LONG: u16 = 4;

    let (text, in_sub_ifd) = match date {
        ExifDate::Original(t) => (t, true),
        ExifDate::Modified(t) => (t, false),
    };
    let mut value = text.as_bytes().to_vec();
    value.push(0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());

    let entry = |tiff: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32| {
        tiff.extend_from_slice(&tag.to_le_bytes());
        tiff.extend_from_slice(&kind.to_le_bytes());
        tiff.extend_from_slice(&count.to_le_bytes());
        tiff.extend_from_slice(&value.to_le_bytes());
    };

    // IFD0 at 8: one entry, then next-IFD offset. Ends at 8 + 2 + 12 + 4.
    let ifd0_end = 26u32;
    tiff.extend_from_slice(&1u16.to_le_bytes());
    if in_sub_ifd {
        entry(&mut tiff, 0x8769, LONG, 1, ifd0_end);
        tiff.extend_from_slice(&0u32.to_le_bytes());

        let sub_end = ifd0_end + 18;
        tiff.extend_from_slice(&1u16.to_le_bytes());
        entry(&mut tiff, 0x9003, ASCII, value.len() as u32, sub_end);
        tiff.extend_from_slice(&0u32.to_le_bytes());
    } else {
        entry(&mut tiff, 0x0132, ASCII, value.len() as u32, ifd0_end);
        tiff.extend_from_slice(&0u32.to_le_bytes());
    }
    tiff.extend_from_slice(&value);
    tiff
}

// =========================================================================
// Canvas probes
// =========================================================================

/// Count pixels that differ from `background`.
pub fn count_non_background(canvas: &image::RgbaImage, background: image::Rgba<u8>) -> usize {
    canvas.pixels().filter(|px| **px != background).count()
}
