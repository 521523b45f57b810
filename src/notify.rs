//! Per-file notifications.
//!
//! The resizer reports every processed file exactly once through a
//! [`NotificationSink`]. Sinks are shared across rayon workers, so they must
//! be `Send + Sync`; the order of notifications across files is unspecified.
//!
//! | Sink | Behavior |
//! |---|---|
//! | [`ConsoleSink`] | One formatted line per file on stdout (the default) |
//! | [`NopSink`] | Discards everything; installed when `None` is given |
//! | `mpsc::Sender<Notification>` | Forwards to a receiver, e.g. a printer thread |
//! | any `Fn(&Notification) + Send + Sync` | Custom handling |

use crate::output;
use crate::resize::{Disposition, Outcome};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// What happened to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub source: PathBuf,
    pub disposition: Disposition,
}

impl Notification {
    pub fn outcome(&self) -> Outcome {
        self.disposition.outcome()
    }

    /// Present for `Skipped`, `Collision`, `Resized` and `Copied`; absent for
    /// `Ignored` and `Canceled`.
    pub fn destination(&self) -> Option<&Path> {
        self.disposition.destination()
    }
}

/// Receives one [`Notification`] per processed file.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Prints each notification as a tagged line on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, notification: &Notification) {
        println!("{}", output::format_notification(notification));
    }
}

/// Does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopSink;

impl NotificationSink for NopSink {
    fn notify(&self, _notification: &Notification) {}
}

impl<F> NotificationSink for F
where
    F: Fn(&Notification) + Send + Sync,
{
    fn notify(&self, notification: &Notification) {
        self(notification)
    }
}

/// A closed receiver is not an error; the notification is dropped.
impl NotificationSink for mpsc::Sender<Notification> {
    fn notify(&self, notification: &Notification) {
        let _ = self.send(notification.clone());
    }
}

/// Unwrap an optional sink, substituting [`NopSink`] for `None`.
pub fn or_nop(sink: Option<Box<dyn NotificationSink>>) -> Box<dyn NotificationSink> {
    sink.unwrap_or_else(|| Box::new(NopSink))
}
