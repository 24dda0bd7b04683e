//! Caption text resolution.
//!
//! The caption of a framed photo comes from one of two sources, first
//! available wins:
//!
//! 1. **Explicit caption**: `--caption` / `caption = "..."`, used verbatim.
//! 2. **Capture date**: EXIF `DateTimeOriginal` (falling back to the IFD0
//!    `DateTime` tag), rendered as `" - JUN '23 -"`.
//!
//! When the date is missing, unreadable, or zero (`0000:00:00 ...`, as
//! written by some cameras with an unset clock), the placeholder
//! [`PLACEHOLDER_CAPTION`] is used instead. Metadata problems never stop an
//! image from being framed.

use std::io::Cursor;
use thiserror::Error;

/// Caption used when no capture date is available.
pub const PLACEHOLDER_CAPTION: &str = " - --- -";

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("capture date unavailable: {0}")]
    Unavailable(String),
}

/// Year and month a photo was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureDate {
    pub year: u16,
    pub month: u8,
}

impl CaptureDate {
    /// Unset camera clocks write all-zero dates.
    pub fn is_zero(self) -> bool {
        self.year == 0 || self.month == 0
    }
}

/// Read the capture date from the EXIF block of an encoded image.
pub fn read_capture_date(image_bytes: &[u8]) -> Result<CaptureDate, MetadataError> {
    let exif = exif::Reader::new()
        .read_from_container(&mut Cursor::new(image_bytes))
        .map_err(|e| MetadataError::Unavailable(e.to_string()))?;

    let field = [exif::Tag::DateTimeOriginal, exif::Tag::DateTime]
        .into_iter()
        .find_map(|tag| exif.get_field(tag, exif::In::PRIMARY))
        .ok_or_else(|| MetadataError::Unavailable("no date tag".to_string()))?;

    let raw = match &field.value {
        exif::Value::Ascii(values) => values.first(),
        _ => None,
    }
    .ok_or_else(|| MetadataError::Unavailable("date tag is not ASCII".to_string()))?;

    let parsed = exif::DateTime::from_ascii(raw)
        .map_err(|e| MetadataError::Unavailable(format!("malformed date: {e}")))?;

    Ok(CaptureDate {
        year: parsed.year,
        month: parsed.month,
    })
}

/// Format a capture date as `" - MON 'YY -"`.
///
/// Zero or out-of-range dates produce the placeholder.
pub fn caption_from_date(date: CaptureDate) -> String {
    if date.is_zero() {
        return PLACEHOLDER_CAPTION.to_string();
    }
    match MONTHS.get(date.month as usize - 1) {
        Some(month) => format!(" - {month} '{:02} -", date.year % 100),
        None => PLACEHOLDER_CAPTION.to_string(),
    }
}

/// Pick the caption for an image: explicit text, else its capture date.
pub fn resolve_caption(explicit: Option<&str>, image_bytes: &[u8]) -> String {
    if let Some(text) = explicit.filter(|t| !t.is_empty()) {
        return text.to_string();
    }
    match read_capture_date(image_bytes) {
        Ok(date) => caption_from_date(date),
        Err(e) => {
            tracing::debug!("{e}; using placeholder caption");
            PLACEHOLDER_CAPTION.to_string()
        }
    }
}
