//! Input enumeration.
//!
//! Turns the paths given on the command line into the list of source files
//! for one batch:
//!
//! - **Regular files** are used as-is, whatever their extension. Passing a
//!   file explicitly is taken as intent.
//! - **Directories** are expanded according to [`FolderMode`], keeping only
//!   files with a decodable image extension (see
//!   [`supported_input_extensions`]).
//! - **Nonexistent paths** are dropped silently (logged at debug level).
//!
//! ```text
//! photos/                      shallow      deep
//! ├── a.jpg                    ✓            ✓
//! ├── notes.txt                ✗            ✗
//! └── 2024/
//!     └── b.png                ✗            ✓
//! ```
//!
//! Each directory's expansion is sorted by path so batches are
//! deterministic. Argument order is preserved, and duplicates are kept.

use crate::imaging::supported_input_extensions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// How directory arguments are expanded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FolderMode {
    /// Directories are skipped entirely.
    Ignore,
    /// Direct children of the directory only.
    #[default]
    Shallow,
    /// All descendants, recursively.
    Deep,
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// List image files inside `dir` according to `mode`.
fn expand_directory(dir: &Path, mode: FolderMode) -> Result<Vec<PathBuf>, ScanError> {
    let max_depth = match mode {
        FolderMode::Ignore => {
            debug!(path = %dir.display(), "ignoring directory");
            return Ok(Vec::new());
        }
        FolderMode::Shallow => 1,
        FolderMode::Deep => usize::MAX,
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_image_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Resolve input paths into a flat list of source files.
pub fn collect_sources(paths: &[PathBuf], mode: FolderMode) -> Result<Vec<PathBuf>, ScanError> {
    let mut sources = Vec::new();
    for path in paths {
        if path.is_dir() {
            sources.extend(expand_directory(path, mode)?);
        } else if path.is_file() {
            sources.push(path.clone());
        } else {
            debug!(path = %path.display(), "dropping nonexistent input");
        }
    }
    Ok(sources)
}
