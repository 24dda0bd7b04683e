//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Batch progress
//!
//! ```text
//! Processed 'dawn.jpg' -> 'out/dawn_framed.jpg'
//! Skipped 'broken.jpg': failed to decode photos/broken.jpg: ...
//!
//! Framed 1 photo, 1 skipped
//! ```
//!
//! ## Font listing
//!
//! ```text
//! Fonts
//!     CourierPrime-Bold (not bundled)
//!     AmericanTypewriter (not bundled)
//!     BigBlueTermPlusNerdFont-Regular (not bundled)
//!     HeavyDataNerdFont-Regular (not bundled)
//!     DejaVuSansMono-Bold (default)
//! ```
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability. Format functions are pure: no I/O, no side effects.
//! Printing happens in `main.rs`.

use crate::imaging::{AVAILABLE_FONTS, FontRegistry};
use crate::process::{BatchSummary, ProcessEvent};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Batch progress
// ============================================================================

/// Format a single progress event as a display line.
///
/// The source is shown by file name; the output by its full path so users
/// can open it directly.
pub fn format_process_event(event: &ProcessEvent) -> String {
    match event {
        ProcessEvent::Processed { source, output } => {
            format!("Processed '{}' -> '{}'", file_name(source), output.display())
        }
        ProcessEvent::Failed { source, error } => {
            format!("Skipped '{}': {error}", file_name(source))
        }
    }
}

/// Format the closing summary line of a batch.
pub fn format_summary(summary: &BatchSummary) -> String {
    match (summary.processed, summary.failed) {
        (0, 0) => "No JPEG files found".to_string(),
        (n, 0) => format!("Framed {}", plural(n, "photo")),
        (n, failed) => format!("Framed {}, {failed} skipped", plural(n, "photo")),
    }
}

// ============================================================================
// Fonts
// ============================================================================

/// Format the font catalogue, marking the default and any font whose file
/// was not embedded at build time.
pub fn format_font_list(registry: &FontRegistry) -> Vec<String> {
    let default = registry.default_font();
    let mut lines = vec!["Fonts".to_string()];
    for name in AVAILABLE_FONTS {
        let mut line = format!("{}{name}", indent(1));
        if *name == default {
            line.push_str(" (default)");
        }
        if !registry.is_bundled(name) {
            line.push_str(" (not bundled)");
        }
        lines.push(line);
    }
    lines
}
