//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! ==> Resizing 4 files at 0.5x (high-quality-bicubic, unit 4)
//! -          resized:	/photos/a.jpg -> /photos/a.scaled.png
//! -          ignored:	/photos/a.scaled.png
//! -          skipped:	/photos/b.jpg (exists: /photos/b.scaled.png)
//! -           copied:	/photos/tiny.gif -> /photos/scaled/tiny.gif
//! ==> Done: 1 resized, 1 copied, 1 skipped, 1 ignored (4 total)
//! ```
//!
//! Format functions return strings and have no side effects; the binary and
//! [`ConsoleSink`](crate::notify::ConsoleSink) do the printing.

use crate::config::ResizeConfig;
use crate::notify::Notification;
use crate::resize::{BatchSummary, Disposition, Outcome};

/// Width the tag column is right-aligned to.
const TAG_WIDTH: usize = 16;

/// Console tag for an outcome.
pub fn outcome_tag(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Ignored => "ignored",
        Outcome::Skipped => "skipped",
        Outcome::Collision => "collision",
        Outcome::Resized => "resized",
        Outcome::Canceled => "canceled",
        Outcome::Copied => "copied",
    }
}

/// Format one notification as a tagged line.
pub fn format_notification(notification: &Notification) -> String {
    let source = notification.source.display();
    let message = match &notification.disposition {
        Disposition::Resized { destination } | Disposition::Copied { destination } => {
            format!("{} -> {}", source, destination.display())
        }
        Disposition::Skipped { destination } => {
            format!("{} (exists: {})", source, destination.display())
        }
        Disposition::Collision { .. } => format!("{} (output would replace the source)", source),
        Disposition::Ignored | Disposition::Canceled => source.to_string(),
    };
    format!(
        "- {:>width$}:\t{}",
        outcome_tag(notification.outcome()),
        message,
        width = TAG_WIDTH
    )
}

/// Header printed before a batch starts.
pub fn format_batch_header(file_count: usize, scale: f64, config: &ResizeConfig) -> String {
    let files = if file_count == 1 { "file" } else { "files" };
    format!(
        "==> Resizing {} {} at {}x ({}, unit {})",
        file_count, files, scale, config.mode, config.unit
    )
}

/// Footer printed after a batch completes.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    format!("==> Done: {}", summary)
}
