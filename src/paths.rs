//! Destination resolution.
//!
//! Where an output goes depends on `output_path`:
//!
//! ```text
//! output_path     source                   output directory
//! (none)          /photos/a/x.jpg    →     /photos/a/
//! /export         /photos/a/x.jpg    →     /export/           (shared by the batch)
//! scaled          /photos/a/x.jpg    →     /photos/a/scaled/  (one per source dir)
//! ```
//!
//! Resolved directories are lexically normalized (`.` dropped, `..` folded
//! into its parent), so `../album` from inside `album/` is `album/` itself.
//!
//! Non-in-place directories are created on demand with `create_dir_all`,
//! which treats an existing directory as success, so parallel workers can
//! race on the same directory safely.
//!
//! Two destinations exist per source: the *resize* destination (stem plus
//! the policy suffix from [`naming`](crate::naming)) and the *copy*
//! destination (the source filename unchanged). They are computed
//! independently by the branch that needs them.

use crate::config::ResizeConfig;
use crate::naming;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Absolute form of `path` with `.` and `..` resolved without touching the
/// filesystem.
pub fn normalize(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

fn file_name(source: &Path) -> io::Result<String> {
    source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a file path: {}", source.display()),
            )
        })
}

/// Directory the source's output goes into, created if missing.
pub fn resolve_output_directory(source: &Path, config: &ResizeConfig) -> io::Result<PathBuf> {
    let source = normalize(source)?;
    let parent = source.parent().map(Path::to_path_buf).unwrap_or_default();

    let Some(output) = &config.output_path else {
        return Ok(parent);
    };

    let dir = if output.is_absolute() {
        normalize(output)?
    } else {
        normalize(&parent.join(output))?
    };
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Where the resized PNG for `source` is written.
pub fn resize_destination(source: &Path, config: &ResizeConfig) -> io::Result<PathBuf> {
    let dir = resolve_output_directory(source, config)?;
    let name = naming::output_filename(
        &file_name(source)?,
        config.compound_extension,
        config.mode_extension,
        config.mode,
    );
    Ok(dir.join(name))
}

/// Where `source` is copied when it cannot be resized.
pub fn copy_destination(source: &Path, config: &ResizeConfig) -> io::Result<PathBuf> {
    let dir = resolve_output_directory(source, config)?;
    Ok(dir.join(file_name(source)?))
}

/// Whether writing to `destination` would overwrite `source` itself.
///
/// Paths are compared after normalization; when both exist they are also
/// compared canonically, which sees through symlinks.
pub fn is_same_file(source: &Path, destination: &Path) -> io::Result<bool> {
    if normalize(source)? == normalize(destination)? {
        return Ok(true);
    }
    if source.exists() && destination.exists() {
        return Ok(std::fs::canonicalize(source)? == std::fs::canonicalize(destination)?);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::InterpolationMode;
    use tempfile::TempDir;

    fn config_with_output(path: Option<PathBuf>) -> ResizeConfig {
        ResizeConfig {
            output_path: path,
            ..ResizeConfig::default()
        }
    }

    // =========================================================================
    // Output directory
    // =========================================================================

    #[test]
    fn in_place_uses_source_directory() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");

        let dir = resolve_output_directory(&source, &config_with_output(None)).unwrap();
        assert_eq!(dir, tmp.path());
    }

    #[test]
    fn absolute_output_used_directly_and_created() {
        let tmp = TempDir::new().unwrap();
        let export = tmp.path().join("export/nested");
        let source = tmp.path().join("a/photo.jpg");

        let dir =
            resolve_output_directory(&source, &config_with_output(Some(export.clone()))).unwrap();
        assert_eq!(dir, export);
        assert!(export.is_dir());
    }

    #[test]
    fn absolute_output_shared_across_source_dirs() {
        let tmp = TempDir::new().unwrap();
        let export = tmp.path().join("export");
        let config = config_with_output(Some(export.clone()));

        let a = resolve_output_directory(&tmp.path().join("a/x.jpg"), &config).unwrap();
        let b = resolve_output_directory(&tmp.path().join("b/y.jpg"), &config).unwrap();
        assert_eq!(a, export);
        assert_eq!(b, export);
    }

    #[test]
    fn relative_output_is_per_source_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("a")).unwrap();
        std::fs::create_dir_all(tmp.path().join("b")).unwrap();
        let config = config_with_output(Some(PathBuf::from("scaled")));

        let a = resolve_output_directory(&tmp.path().join("a/x.jpg"), &config).unwrap();
        let b = resolve_output_directory(&tmp.path().join("b/y.jpg"), &config).unwrap();
        assert_eq!(a, tmp.path().join("a/scaled"));
        assert_eq!(b, tmp.path().join("b/scaled"));
        assert!(a.is_dir());
        assert!(b.is_dir());
    }

    #[test]
    fn relative_output_through_parent_resolves_to_source_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("album")).unwrap();
        let config = config_with_output(Some(PathBuf::from("../album")));

        let dir = resolve_output_directory(&tmp.path().join("album/tiny.jpg"), &config).unwrap();
        assert_eq!(dir, tmp.path().join("album"));
    }

    #[test]
    fn absolute_output_is_normalized() {
        let tmp = TempDir::new().unwrap();
        let export = tmp.path().join("a/../export");
        let config = config_with_output(Some(export));

        let dir = resolve_output_directory(&tmp.path().join("x.jpg"), &config).unwrap();
        assert_eq!(dir, tmp.path().join("export"));
    }

    #[test]
    fn resolving_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        let config = config_with_output(Some(PathBuf::from("out")));

        let first = resolve_output_directory(&source, &config).unwrap();
        let second = resolve_output_directory(&source, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn relative_source_is_made_absolute() {
        let dir = resolve_output_directory(Path::new("photo.jpg"), &config_with_output(None))
            .unwrap();
        assert!(dir.is_absolute());
    }

    // =========================================================================
    // Destinations
    // =========================================================================

    #[test]
    fn resize_destination_default_policy() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpg");
        let dest = resize_destination(&source, &ResizeConfig::default()).unwrap();
        assert_eq!(dest, tmp.path().join("photo.scaled.png"));
    }

    #[test]
    fn resize_destination_with_mode_tag() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.raw.jpg");
        let config = ResizeConfig {
            mode_extension: true,
            mode: InterpolationMode::Bicubic,
            ..ResizeConfig::default()
        };
        let dest = resize_destination(&source, &config).unwrap();
        assert_eq!(dest, tmp.path().join("photo.scaled.bc.png"));
    }

    #[test]
    fn resize_destination_without_compound_extension() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.jpeg");
        let config = ResizeConfig {
            compound_extension: false,
            ..ResizeConfig::default()
        };
        let dest = resize_destination(&source, &config).unwrap();
        assert_eq!(dest, tmp.path().join("photo.png"));
    }

    #[test]
    fn copy_destination_keeps_full_name() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("a.b.c.jpg");
        let config = config_with_output(Some(PathBuf::from("out")));
        let dest = copy_destination(&source, &config).unwrap();
        assert_eq!(dest, tmp.path().join("out/a.b.c.jpg"));
    }

    #[test]
    fn destination_of_directory_path_errors() {
        let result = resize_destination(Path::new("/"), &ResizeConfig::default());
        assert!(result.is_err());
    }

    // =========================================================================
    // Self-collision
    // =========================================================================

    #[test]
    fn same_file_detected_for_in_place_png() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("photo.png");
        let config = ResizeConfig {
            compound_extension: false,
            ..ResizeConfig::default()
        };
        let dest = resize_destination(&source, &config).unwrap();
        assert!(is_same_file(&source, &dest).unwrap());
    }

    #[test]
    fn same_file_ignores_cur_dir_components() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("photo.png");
        let b = tmp.path().join(".").join("photo.png");
        assert!(is_same_file(&a, &b).unwrap());
    }

    #[test]
    fn same_file_through_parent_dir() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("album/tiny.jpg");
        let dest = tmp.path().join("album/../album/tiny.jpg");
        assert!(is_same_file(&source, &dest).unwrap());
    }

    #[test]
    fn copy_destination_through_parent_is_source() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("album")).unwrap();
        let source = tmp.path().join("album/tiny.jpg");
        let config = config_with_output(Some(PathBuf::from("../album")));

        let dest = copy_destination(&source, &config).unwrap();
        assert_eq!(dest, source);
        assert!(is_same_file(&source, &dest).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn same_file_through_symlinked_dir() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        std::fs::create_dir_all(&real).unwrap();
        std::fs::write(real.join("photo.png"), b"png").unwrap();
        std::os::unix::fs::symlink(&real, tmp.path().join("link")).unwrap();

        assert!(
            is_same_file(&real.join("photo.png"), &tmp.path().join("link/photo.png")).unwrap()
        );
    }

    #[test]
    fn normalize_folds_parent_and_current_dirs() {
        let tmp = TempDir::new().unwrap();
        let messy = tmp.path().join("a/./b/../c");
        assert_eq!(normalize(&messy).unwrap(), tmp.path().join("a/c"));
    }

    #[test]
    fn different_files_are_not_same() {
        let tmp = TempDir::new().unwrap();
        assert!(
            !is_same_file(&tmp.path().join("photo.jpg"), &tmp.path().join("photo.png")).unwrap()
        );
    }
}
