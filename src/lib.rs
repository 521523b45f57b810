//! # Photo Resizer
//!
//! A batch image resizer. Give it files and folders and a scale factor; it
//! decides per file whether to resize, copy, skip, or leave it alone, and
//! writes resized images as PNG next to the originals or into an output
//! directory.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      paths    →  source files   (folder expansion, image filter)
//! 2. Resize    sources  →  outputs        (per-file decision, in parallel)
//! 3. Report    outcomes →  console        (one tagged line per file, summary)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Expands command-line paths into the batch's source files |
//! | [`resize`] | The decision engine: `Resizer`, `Outcome`, batch summary |
//! | [`imaging`] | Size arithmetic, interpolation modes, and the image backend |
//! | [`naming`] | Stem extraction, `scaled` marker detection, output suffixes |
//! | [`paths`] | Output directory and destination resolution, self-collision |
//! | [`notify`] | Per-file notification sinks |
//! | [`config`] | `photo-resizer.toml` loading, defaults, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## PNG-Only Output
//!
//! Every resized image is written as PNG regardless of its source format.
//! Lossless output means resizing never stacks a second round of compression
//! artifacts on top of the source's, and one format keeps naming simple:
//! the output extension is always `.png`.
//!
//! ## Outcomes, Not Errors
//!
//! Skipping a file is a normal result. Every file ends in exactly one
//! [`resize::Outcome`] and produces exactly one notification. Only real
//! failures (unreadable images, I/O errors, an invalid scale) are errors,
//! and those abort the batch.
//!
//! ## Loop Protection
//!
//! Outputs carry a `.scaled` marker in their name and are ignored on
//! later runs, so pointing the tool at the same folder twice does not
//! resize its own output again.

pub mod config;
pub mod imaging;
pub mod naming;
pub mod notify;
pub mod output;
pub mod paths;
pub mod resize;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
