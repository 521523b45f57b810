//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Resize → PNG** | `resize_exact` + `PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math and size-bound policy (unit testable)
//! - **Parameters**: Interpolation modes and resize requests
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    SizeBounds, is_resizable, round_to_unit, scale_then_floor, target_dimensions,
};
pub use params::{InterpolationMode, ResizeParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
