//! The resize decision engine.
//!
//! [`Resizer`] takes a batch of source files and a scale factor and, for
//! each file, decides what to do and reports exactly one [`Outcome`]
//! through its [`NotificationSink`].
//!
//! ## Decision sequence
//!
//! First matching rule wins:
//!
//! ```text
//! name has a .scaled. segment (and ignore_scaled)  → Ignored
//! identify → target = round(floor(dim × scale), unit) per axis
//! resizable?
//! ├─ yes: dest = <dir>/<stem><suffix>
//! │       dest == source                          → Collision
//! │       dest exists && !overwrite               → Skipped
//! │       decode → resize → encode PNG            → Resized
//! └─ no:  !copy_unresizable                       → Canceled
//!         dest = <dir>/<original filename>
//!         dest == source                          → Collision
//!         dest exists && !overwrite               → Skipped
//!         byte copy                               → Copied
//! ```
//!
//! ## Errors
//!
//! The scale factor is validated once per batch, before any file is
//! touched. Outcomes are not errors. Backend and I/O failures are: they
//! propagate and abort the batch (files already running on other workers
//! may still complete and notify).
//!
//! ## Parallel Processing
//!
//! Files are processed in parallel on the global [rayon](https://docs.rs/rayon)
//! pool. The config is read-only for the whole batch. Distinct sources can
//! share a destination (`img.png` and `img.bmp` both resize to
//! `img.scaled.png`), so the existence check and the write for a
//! destination run under a per-destination lock held for the whole batch.
//! The result matches some sequential order: one source is Resized, the
//! others find the output and are Skipped (or overwrite it in turn).

use crate::config::ResizeConfig;
use crate::imaging::{
    BackendError, ImageBackend, ResizeParams, RustBackend, is_resizable, target_dimensions,
};
use crate::naming;
use crate::notify::{ConsoleSink, Notification, NotificationSink, or_nop};
use crate::paths;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use tracing::debug;

/// Largest accepted scale factor.
pub const MAX_SCALE: f64 = 100.0;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Invalid scale factor {0}: must be greater than 0, not 1, and at most 100")]
    InvalidScale(f64),
}

/// Check a scale factor before any file is processed.
///
/// Accepted: finite, `> 0`, `!= 1`, `<= 100`.
pub fn validate_scale(scale: f64) -> Result<(), ResizeError> {
    if !scale.is_finite() || scale <= 0.0 || scale == 1.0 || scale > MAX_SCALE {
        return Err(ResizeError::InvalidScale(scale));
    }
    Ok(())
}

/// The classified result of processing one source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Already carries a `scaled` marker.
    Ignored,
    /// Destination exists and overwriting is off.
    Skipped,
    /// Destination resolves to the source file itself.
    Collision,
    /// Resized and written as PNG.
    Resized,
    /// Not resizable and copying is off.
    Canceled,
    /// Not resizable, copied unchanged.
    Copied,
}

/// What happened to one source file, with the destination wherever one
/// was computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Ignored,
    Canceled,
    Skipped { destination: PathBuf },
    Collision { destination: PathBuf },
    Resized { destination: PathBuf },
    Copied { destination: PathBuf },
}

impl Disposition {
    pub fn outcome(&self) -> Outcome {
        match self {
            Disposition::Ignored => Outcome::Ignored,
            Disposition::Canceled => Outcome::Canceled,
            Disposition::Skipped { .. } => Outcome::Skipped,
            Disposition::Collision { .. } => Outcome::Collision,
            Disposition::Resized { .. } => Outcome::Resized,
            Disposition::Copied { .. } => Outcome::Copied,
        }
    }

    pub fn destination(&self) -> Option<&Path> {
        match self {
            Disposition::Ignored | Disposition::Canceled => None,
            Disposition::Skipped { destination }
            | Disposition::Collision { destination }
            | Disposition::Resized { destination }
            | Disposition::Copied { destination } => Some(destination),
        }
    }
}

/// Outcome counts for one batch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub ignored: u32,
    pub skipped: u32,
    pub collisions: u32,
    pub resized: u32,
    pub canceled: u32,
    pub copied: u32,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Ignored => &mut self.ignored,
            Outcome::Skipped => &mut self.skipped,
            Outcome::Collision => &mut self.collisions,
            Outcome::Resized => &mut self.resized,
            Outcome::Canceled => &mut self.canceled,
            Outcome::Copied => &mut self.copied,
        };
        *counter += 1;
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            ignored: self.ignored + other.ignored,
            skipped: self.skipped + other.skipped,
            collisions: self.collisions + other.collisions,
            resized: self.resized + other.resized,
            canceled: self.canceled + other.canceled,
            copied: self.copied + other.copied,
        }
    }

    pub fn total(&self) -> u32 {
        self.ignored + self.skipped + self.collisions + self.resized + self.canceled + self.copied
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = [
            (self.resized, "resized"),
            (self.copied, "copied"),
            (self.skipped, "skipped"),
            (self.collisions, "collided"),
            (self.canceled, "canceled"),
            (self.ignored, "ignored"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{} {}", n, label))
        .collect();

        if parts.is_empty() {
            write!(f, "no files processed")
        } else {
            write!(f, "{} ({} total)", parts.join(", "), self.total())
        }
    }
}

/// Batch resizer.
///
/// Owns its [`ResizeConfig`] for its whole lifetime; only a shared reference
/// is handed out, so a batch always runs with one consistent configuration.
pub struct Resizer<B: ImageBackend = RustBackend> {
    config: ResizeConfig,
    backend: B,
    sink: Box<dyn NotificationSink>,
}

impl Resizer<RustBackend> {
    /// Resizer using the pure Rust backend and console notifications.
    pub fn new(config: ResizeConfig) -> Self {
        Self::with_backend(config, RustBackend::new())
    }
}

impl<B: ImageBackend> Resizer<B> {
    /// Resizer using a specific backend (allows testing with mock).
    pub fn with_backend(config: ResizeConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            sink: Box::new(ConsoleSink),
        }
    }

    /// Replace the notification sink. `None` installs a no-op sink.
    pub fn with_sink(mut self, sink: Option<Box<dyn NotificationSink>>) -> Self {
        self.set_sink(sink);
        self
    }

    /// Replace the notification sink. `None` installs a no-op sink.
    pub fn set_sink(&mut self, sink: Option<Box<dyn NotificationSink>>) {
        self.sink = or_nop(sink);
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Process every file in `files`.
    ///
    /// Fails fast with [`ResizeError::InvalidScale`] before touching any
    /// file; otherwise returns the outcome counts, or the first backend/I/O
    /// error encountered.
    pub fn resize_batch(&self, files: &[PathBuf], scale: f64) -> Result<BatchSummary, ResizeError> {
        validate_scale(scale)?;
        let locks = DestinationLocks::default();

        files
            .par_iter()
            .map(|file| self.process(file, scale, &locks))
            .try_fold(BatchSummary::default, |mut summary, outcome| {
                summary.record(outcome?);
                Ok::<_, ResizeError>(summary)
            })
            .try_reduce(BatchSummary::default, |a, b| Ok(a.merge(b)))
    }

    /// Process a single file as a batch of one.
    pub fn resize_file(&self, file: &Path, scale: f64) -> Result<Outcome, ResizeError> {
        validate_scale(scale)?;
        self.process(file, scale, &DestinationLocks::default())
    }

    fn process(
        &self,
        file: &Path,
        scale: f64,
        locks: &DestinationLocks,
    ) -> Result<Outcome, ResizeError> {
        let disposition = self.classify(file, scale, locks)?;
        let outcome = disposition.outcome();
        debug!(source = %file.display(), ?outcome, "classified");
        self.sink.notify(&Notification {
            source: file.to_path_buf(),
            disposition,
        });
        Ok(outcome)
    }

    /// Run the decision sequence, performing the resize or copy if chosen.
    fn classify(
        &self,
        file: &Path,
        scale: f64,
        locks: &DestinationLocks,
    ) -> Result<Disposition, ResizeError> {
        let config = &self.config;

        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if config.ignore_scaled && naming::has_scaled_marker(&filename) {
            return Ok(Disposition::Ignored);
        }

        let original = self.backend.identify(file)?;
        let target = target_dimensions(original, scale, config.unit);
        debug!(
            source = %file.display(),
            %original,
            %target,
            "computed target size"
        );

        if is_resizable(original, target, scale, &config.bounds) {
            let destination = paths::resize_destination(file, config)?;
            let params = ResizeParams {
                source: file.to_path_buf(),
                output: destination.clone(),
                width: target.width,
                height: target.height,
                mode: config.mode,
            };
            let write = || -> Result<(), ResizeError> { Ok(self.backend.resize(&params)?) };
            if let Some(blocked) = self.write_guarded(file, &destination, locks, write)? {
                return Ok(blocked);
            }
            return Ok(Disposition::Resized { destination });
        }

        if !config.copy_unresizable {
            return Ok(Disposition::Canceled);
        }

        let destination = paths::copy_destination(file, config)?;
        let write = || -> Result<(), ResizeError> {
            std::fs::copy(file, &destination)?;
            Ok(())
        };
        if let Some(blocked) = self.write_guarded(file, &destination, locks, write)? {
            return Ok(blocked);
        }
        Ok(Disposition::Copied { destination })
    }

    /// Run `write` unless `destination` is the source itself or already
    /// exists without overwrite. Returns the blocking disposition, if any.
    fn write_guarded(
        &self,
        source: &Path,
        destination: &Path,
        locks: &DestinationLocks,
        write: impl FnOnce() -> Result<(), ResizeError>,
    ) -> Result<Option<Disposition>, ResizeError> {
        if paths::is_same_file(source, destination)? {
            return Ok(Some(Disposition::Collision {
                destination: destination.to_path_buf(),
            }));
        }

        let lock = locks.lock_for(destination);
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if destination.exists() && !self.config.overwrite {
            return Ok(Some(Disposition::Skipped {
                destination: destination.to_path_buf(),
            }));
        }
        write()?;
        Ok(None)
    }
}

/// One lock per destination path, shared by every worker of a batch.
#[derive(Default)]
struct DestinationLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl DestinationLocks {
    fn lock_for(&self, destination: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(destination.to_path_buf()).or_default().clone()
    }
}
