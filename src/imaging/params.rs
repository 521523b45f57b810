//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`resize`](crate::resize) orchestrator (which
//! decides what images to create) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping
//! backends (e.g. for testing with a mock) without changing decision logic.
//!
//! ## Types
//!
//! - [`InterpolationMode`]: resampling quality selected by the user, plus its
//!   short filename code used for mode-tagged output names.
//! - [`ResizeParams`]: everything one resize needs (source, output path,
//!   exact target dimensions, interpolation mode).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Interpolation used when resampling.
///
/// The variants mirror the classic GDI+ quality levels that photo tools
/// expose. Backends map them onto whatever filters they actually have.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationMode {
    Default,
    Low,
    High,
    Bilinear,
    Bicubic,
    HighQualityBilinear,
    #[default]
    HighQualityBicubic,
    NearestNeighbor,
}

/// Filename codes for mode-tagged output (`name.scaled.<code>.png`).
///
/// Kept as an explicit table: a mode without an entry gets the plain
/// `.scaled.png` suffix instead of someone else's code.
const MODE_CODES: &[(InterpolationMode, &str)] = &[
    (InterpolationMode::Default, "def"),
    (InterpolationMode::Low, "lo"),
    (InterpolationMode::High, "hi"),
    (InterpolationMode::Bilinear, "bl"),
    (InterpolationMode::Bicubic, "bc"),
    (InterpolationMode::HighQualityBilinear, "hqbl"),
    (InterpolationMode::HighQualityBicubic, "hqbc"),
    (InterpolationMode::NearestNeighbor, "nn"),
];

impl InterpolationMode {
    /// Short code for this mode, if it has one.
    pub fn code(self) -> Option<&'static str> {
        MODE_CODES
            .iter()
            .find(|(mode, _)| *mode == self)
            .map(|(_, code)| *code)
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Default => "default",
            Self::Low => "low",
            Self::High => "high",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::HighQualityBilinear => "high-quality-bilinear",
            Self::HighQualityBicubic => "high-quality-bicubic",
            Self::NearestNeighbor => "nearest-neighbor",
        };
        f.write_str(name)
    }
}

/// Parameters for a resize operation.
///
/// `width` and `height` are exact: the backend must not preserve aspect
/// ratio on its own, the orchestrator already decided the final size.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mode: InterpolationMode,
}
