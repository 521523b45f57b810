//! Shared test utilities for the photo-resizer test suite.
//!
//! Provides image fixtures written with the `image` crate, empty-file
//! helpers for tests that run against the mock backend, and a sink that
//! records every notification it receives.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_png(&tmp.path().join("a.png"), 64, 48);
//!
//! let (sink, seen) = recording_sink();
//! let resizer = Resizer::new(ResizeConfig::default()).with_sink(Some(sink));
//! resizer.resize_batch(&files, 0.5).unwrap();
//! assert_eq!(seen.lock().unwrap().len(), files.len());
//! ```

use std::path::Path;
use std::sync::{Arc, Mutex};

use image::{ImageBuffer, Rgb, RgbImage};

use crate::notify::{Notification, NotificationSink};

// =========================================================================
// Fixture files
// =========================================================================

/// Create an empty file, including parent directories.
pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

/// Gradient so encoders and resamplers have something non-uniform to chew on.
fn gradient(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
        ])
    })
}

/// Write a real JPEG of the given size.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write a real PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

// =========================================================================
// Notifications
// =========================================================================

pub type RecordedNotifications = Arc<Mutex<Vec<Notification>>>;

/// A sink that appends to a shared vector, plus a handle to that vector.
pub fn recording_sink() -> (Box<dyn NotificationSink>, RecordedNotifications) {
    let seen: RecordedNotifications = Arc::new(Mutex::new(Vec::new()));
    let handle = seen.clone();
    let sink = move |n: &Notification| handle.lock().unwrap().push(n.clone());
    (Box::new(sink), seen)
}
