//! Resizer configuration module.
//!
//! Handles loading, validating, and merging the TOML config file. Values are
//! layered: stock defaults are overridden by the config file, which is in
//! turn overridden by command-line flags (applied by the binary).
//!
//! ## Config File Location
//!
//! Pass `--config FILE` explicitly, or drop a `photo-resizer.toml` in the
//! working directory. Without either, the stock defaults apply.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resize]
//! mode = "high-quality-bicubic"  # Interpolation mode
//! unit = 4                       # Round target sizes down to multiples of this
//! # min_size = { width = 256, height = 256 }    # Never shrink below this
//! # max_size = { width = 4096, height = 4096 }  # Never grow above this
//!
//! [output]
//! # path = "scaled"            # Absent = next to the source; relative = per source dir
//! compound_extension = true    # name.scaled.png instead of name.png
//! mode_extension = false       # name.scaled.hqbc.png
//! overwrite = false            # Replace existing outputs
//! ignore_scaled = true         # Skip files already carrying a .scaled. marker
//! copy_unresizable = false     # Copy files that cannot be resized
//!
//! [input]
//! folders = "shallow"          # ignore | shallow | deep
//!
//! [processing]
//! # max_processes = 4          # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Dimensions, InterpolationMode, SizeBounds};
use crate::scan::FolderMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "photo-resizer.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration as read from the config file.
///
/// All fields have sensible defaults. Config files need only specify the
/// values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Resampling settings (mode, rounding unit, size bounds).
    pub resize: ResizeSettings,
    /// Output naming and overwrite policy.
    pub output: OutputSettings,
    /// How directory arguments are expanded.
    pub input: InputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resize.unit == 0 {
            return Err(ConfigError::Validation(
                "resize.unit must be a positive integer".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The immutable per-batch settings handed to the resizer.
    pub fn resize_config(&self) -> ResizeConfig {
        ResizeConfig {
            mode: self.resize.mode,
            unit: self.resize.unit,
            bounds: SizeBounds {
                min: self.resize.min_size,
                max: self.resize.max_size,
            },
            output_path: self
                .output
                .path
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            compound_extension: self.output.compound_extension,
            mode_extension: self.output.mode_extension,
            overwrite: self.output.overwrite,
            ignore_scaled: self.output.ignore_scaled,
            copy_unresizable: self.output.copy_unresizable,
        }
    }
}

/// Resampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeSettings {
    /// Interpolation mode used by the backend.
    pub mode: InterpolationMode,
    /// Target dimensions are rounded down to multiples of this (1 = no rounding).
    pub unit: u32,
    /// Lower bound applied when shrinking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Dimensions>,
    /// Upper bound applied when growing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<Dimensions>,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            mode: InterpolationMode::default(),
            unit: 4,
            min_size: None,
            max_size: None,
        }
    }
}

/// Output naming and overwrite policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Output directory. Absent or empty writes next to each source file;
    /// relative paths are resolved against each source file's directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Tag outputs as `name.scaled.png` rather than `name.png`.
    pub compound_extension: bool,
    /// Add the interpolation mode code: `name.scaled.hqbc.png`.
    pub mode_extension: bool,
    /// Replace outputs that already exist.
    pub overwrite: bool,
    /// Ignore sources whose extensions already include `scaled`.
    pub ignore_scaled: bool,
    /// Copy sources that cannot be resized instead of canceling them.
    pub copy_unresizable: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: None,
            compound_extension: true,
            mode_extension: false,
            overwrite: false,
            ignore_scaled: true,
            copy_unresizable: false,
        }
    }
}

/// Input enumeration settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// How directories among the input paths are expanded.
    pub folders: FolderMode,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Settings for one resize batch.
///
/// Built once per batch (usually via [`Config::resize_config`]) and owned
/// by the [`Resizer`](crate::resize::Resizer), which never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeConfig {
    pub mode: InterpolationMode,
    pub unit: u32,
    pub bounds: SizeBounds,
    pub output_path: Option<PathBuf>,
    pub compound_extension: bool,
    pub mode_extension: bool,
    pub overwrite: bool,
    pub ignore_scaled: bool,
    pub copy_unresizable: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Config::default().resize_config()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration.
///
/// - `Some(path)`: the file must exist; it is merged over the stock defaults.
/// - `None`: [`DEFAULT_CONFIG_FILE`] in the working directory is used if
///   present, otherwise the stock defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Some(toml::from_str(&content)?)
        }
        None => load_raw_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-resizer configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Save as photo-resizer.toml in the working directory, or pass --config FILE.
# Command-line flags override values from this file.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Resampling
# ---------------------------------------------------------------------------
[resize]
# Interpolation mode: default, low, high, bilinear, bicubic,
# high-quality-bilinear, high-quality-bicubic, nearest-neighbor.
mode = "high-quality-bicubic"

# Target width and height are rounded down to multiples of this value
# (never below the value itself). 1 disables rounding.
unit = 4

# Smallest allowed result when shrinking. Files that would end up smaller
# are canceled (or copied, see output.copy_unresizable).
# min_size = { width = 256, height = 256 }

# Largest allowed result when growing.
# max_size = { width = 4096, height = 4096 }

# ---------------------------------------------------------------------------
# Output naming
# ---------------------------------------------------------------------------
[output]
# Output directory. Omit to write next to each source file. Absolute paths
# collect every output in one place; relative paths create a folder inside
# each source file's directory.
# path = "scaled"

# Name outputs name.scaled.png (true) or name.png (false).
compound_extension = true

# Include the interpolation mode: name.scaled.hqbc.png.
mode_extension = false

# Replace outputs that already exist.
overwrite = false

# Ignore sources that already carry a .scaled. marker in their name.
ignore_scaled = true

# Copy files that cannot be resized (size unchanged or out of bounds)
# to the output directory instead of leaving them out.
copy_unresizable = false

# ---------------------------------------------------------------------------
# Input
# ---------------------------------------------------------------------------
[input]
# What to do with directory arguments: ignore, shallow (direct children),
# deep (all descendants).
folders = "shallow"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
