//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the resize engine
//! needs: identify (read pixel dimensions) and resize (decode, resample to an
//! exact size, encode PNG).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust, built on the
//! `image` crate. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel dimensions of an image, a target size, or a size bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WIDTHxHEIGHT`, e.g. `256x256` (`X` is accepted too).
impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
        let width = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid width '{w}': {e}"))?;
        let height = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid height '{h}': {e}"))?;
        Ok(Self { width, height })
    }
}

/// Trait for image processing backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, resample to exactly `width`×`height` and write
    /// a PNG to `params.output`.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::InterpolationMode;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    /// Uses Mutex (not RefCell) so it is Sync and works with rayon's par_iter.
    ///
    /// Dimensions are looked up by path first, then fall back to `default_dims`.
    /// With `write_outputs`, `resize` also creates an empty output file after a
    /// short delay, so concurrent existence checks can be observed.
    #[derive(Default)]
    pub struct MockBackend {
        pub default_dims: Option<Dimensions>,
        pub dims_by_path: Mutex<HashMap<PathBuf, Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        pub write_outputs: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            mode: InterpolationMode,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Every identified file reports `width`×`height`.
        pub fn with_dimensions(width: u32, height: u32) -> Self {
            Self {
                default_dims: Some(Dimensions { width, height }),
                ..Self::default()
            }
        }

        pub fn writing_outputs(mut self) -> Self {
            self.write_outputs = true;
            self
        }

        pub fn set_dimensions(&self, path: &Path, width: u32, height: u32) {
            self.dims_by_path
                .lock()
                .unwrap()
                .insert(path.to_path_buf(), Dimensions { width, height });
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn resize_count(&self) -> usize {
            self.get_operations()
                .iter()
                .filter(|op| matches!(op, RecordedOp::Resize { .. }))
                .count()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.dims_by_path
                .lock()
                .unwrap()
                .get(path)
                .copied()
                .or(self.default_dims)
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                mode: params.mode,
            });
            if self.write_outputs {
                std::thread::sleep(std::time::Duration::from_millis(2));
                std::fs::write(&params.output, b"")?;
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(800, 600);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_per_path_dimensions_override_default() {
        let backend = MockBackend::with_dimensions(800, 600);
        backend.set_dimensions(Path::new("/big.jpg"), 4000, 3000);

        assert_eq!(
            backend.identify(Path::new("/big.jpg")).unwrap(),
            Dimensions {
                width: 4000,
                height: 3000
            }
        );
        assert_eq!(backend.identify(Path::new("/other.jpg")).unwrap().width, 800);
    }

    #[test]
    fn mock_without_dimensions_errors() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/x.jpg")).is_err());
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();

        backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: "/source.scaled.png".into(),
                width: 800,
                height: 600,
                mode: InterpolationMode::Bicubic,
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 800,
                height: 600,
                mode: InterpolationMode::Bicubic,
                ..
            }
        ));
    }

    // =========================================================================
    // Dimensions parsing
    // =========================================================================

    #[test]
    fn dimensions_parse_and_display() {
        let d: Dimensions = "256x128".parse().unwrap();
        assert_eq!(
            d,
            Dimensions {
                width: 256,
                height: 128
            }
        );
        assert_eq!(d.to_string(), "256x128");
    }

    #[test]
    fn dimensions_parse_uppercase_separator() {
        let d: Dimensions = " 4096X2048 ".parse().unwrap();
        assert_eq!(d.width, 4096);
        assert_eq!(d.height, 2048);
    }

    #[test]
    fn dimensions_parse_rejects_garbage() {
        assert!("256".parse::<Dimensions>().is_err());
        assert!("axb".parse::<Dimensions>().is_err());
        assert!("-1x5".parse::<Dimensions>().is_err());
    }
}
