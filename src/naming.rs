//! Filename conventions for scaled output.
//!
//! Source filenames are split on `.` into segments. The first non-empty
//! segment is the *stem*; everything after it is the *extension set*:
//!
//! - `photo.jpg` → stem `photo`, extensions `[jpg]`
//! - `photo.scaled.hqbc.png` → stem `photo`, extensions `[scaled, hqbc, png]`
//! - `a.b.c.jpg` → stem `a` (not `a.b.c`)
//! - `.hidden.png` → stem `hidden`
//!
//! Output names are the stem plus a suffix chosen by the extension policy:
//!
//! | compound_extension | mode_extension | Suffix |
//! |---|---|---|
//! | off | (none) | `.png` |
//! | on | off | `.scaled.png` |
//! | on | on | `.scaled.<code>.png` (e.g. `.scaled.hqbc.png`) |
//!
//! Truncating at the first dot is what strips earlier `scaled` tags, so
//! re-scaling `x.scaled.png` with the filter disabled yields `x.scaled.png`
//! again rather than `x.scaled.scaled.png`.

use crate::imaging::InterpolationMode;

/// Marker segment carried by every compound output name.
pub const SCALED_MARKER: &str = "scaled";

/// Non-empty dot-separated segments of a filename.
fn segments(filename: &str) -> impl Iterator<Item = &str> {
    filename.split('.').filter(|s| !s.is_empty())
}

/// The part of `filename` before its first dot.
///
/// Falls back to the whole name for degenerate inputs like `"..."`.
pub fn stem(filename: &str) -> &str {
    segments(filename).next().unwrap_or(filename)
}

/// Whether the extension set of `filename` contains the `scaled` marker
/// (case-insensitive). The stem itself never counts: `scaled.jpg` is a
/// normal source file.
pub fn has_scaled_marker(filename: &str) -> bool {
    segments(filename)
        .skip(1)
        .any(|ext| ext.eq_ignore_ascii_case(SCALED_MARKER))
}

/// Suffix appended to the stem of a resized file.
pub fn output_suffix(
    compound_extension: bool,
    mode_extension: bool,
    mode: InterpolationMode,
) -> String {
    if !compound_extension {
        return ".png".to_string();
    }
    match mode.code() {
        Some(code) if mode_extension => format!(".{SCALED_MARKER}.{code}.png"),
        _ => format!(".{SCALED_MARKER}.png"),
    }
}

/// Filename of the resized output for `source_filename`.
pub fn output_filename(
    source_filename: &str,
    compound_extension: bool,
    mode_extension: bool,
    mode: InterpolationMode,
) -> String {
    format!(
        "{}{}",
        stem(source_filename),
        output_suffix(compound_extension, mode_extension, mode)
    )
}
