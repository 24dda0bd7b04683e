//! Input matching and output naming.
//!
//! Only JPEGs are framed. A file qualifies by extension alone, compared
//! case-insensitively:
//! - `a.jpg`, `b.JPEG`, `c.Jpg` → framed
//! - `d.png`, `e`, `.jpg` (a dotfile, no extension) → skipped
//!
//! Output files are always `.jpg` and carry a style suffix:
//! - `holiday.jpeg` + solid → `holiday_framed.jpg`
//! - `holiday.jpeg` + instagram → `holiday_instagram.jpg`

use crate::imaging::BorderStyle;
use std::path::{Path, PathBuf};

const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Whether `path` names a JPEG by its extension.
pub fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| JPEG_EXTENSIONS.iter().any(|j| e.eq_ignore_ascii_case(j)))
}

/// Output path for `source` framed with `style`, inside `output_dir`.
pub fn output_path(source: &Path, output_dir: &Path, style: BorderStyle) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    output_dir.join(format!("{stem}{}.jpg", style.output_suffix()))
}
