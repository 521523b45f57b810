//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, BMP, GIF) | `image::ImageReader` |
//! | Resize | `image::DynamicImage::resize_exact` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//!
//! ## Filter mapping
//!
//! | Mode | `FilterType` |
//! |---|---|
//! | nearest-neighbor, low | `Nearest` |
//! | default, bilinear, high-quality-bilinear | `Triangle` |
//! | bicubic | `CatmullRom` |
//! | high, high-quality-bicubic | `Lanczos3` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{InterpolationMode, ResizeParams};
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filter_for(mode: InterpolationMode) -> FilterType {
    match mode {
        InterpolationMode::NearestNeighbor | InterpolationMode::Low => FilterType::Nearest,
        InterpolationMode::Default
        | InterpolationMode::Bilinear
        | InterpolationMode::HighQualityBilinear => FilterType::Triangle,
        InterpolationMode::Bicubic => FilterType::CatmullRom,
        InterpolationMode::High | InterpolationMode::HighQualityBicubic => FilterType::Lanczos3,
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save as PNG regardless of the output extension.
///
/// PNG has no float samples, so float images (some TIFFs) are narrowed to 16 bits.
fn save_png(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let narrowed;
    let img = match img.color() {
        ColorType::Rgb32F | ColorType::Rgba32F => {
            narrowed = DynamicImage::ImageRgba16(img.to_rgba16());
            &narrowed
        }
        _ => img,
    };
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    img.write_with_encoder(PngEncoder::new(writer))
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "Failed to read dimensions of {}: {}",
                    path.display(),
                    e
                ))
            })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, filter_for(params.mode));
        save_png(&resized, &params.output)
    }
}
