// src/progress.rs

//! Progress reporting for conversion batches
//!
//! The converter reports through the `ProgressTracker` trait, so the same
//! batch can drive a terminal progress bar, log lines, or a test callback.
//! Implementations must be `Send + Sync`: files are converted on a worker
//! pool and report concurrently.
//!
//! - `SilentProgress`: counts, prints nothing
//! - `LogProgress`: logs through tracing at intervals
//! - `CallbackProgress`: forwards every event to a closure

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::info;

/// Core trait for batch progress
pub trait ProgressTracker: Send + Sync {
    /// Number of files discovered
    fn set_total(&self, total: u64);

    /// A worker started converting `path`
    fn file_started(&self, path: &Path);

    /// `path` was converted and written
    fn file_converted(&self, path: &Path);

    /// `path` failed with `reason`
    fn file_failed(&self, path: &Path, reason: &str);

    /// The batch ended; `message` summarises it
    fn finish(&self, message: &str);
}

/// Counters shared by the bundled trackers
#[derive(Debug, Default)]
struct Counters {
    total: AtomicU64,
    converted: AtomicU64,
    failed: AtomicU64,
    finished: AtomicBool,
}

impl Counters {
    fn done(&self) -> u64 {
        self.converted.load(Ordering::Relaxed) + self.failed.load(Ordering::Relaxed)
    }
}

/// Progress tracker that only counts
#[derive(Debug, Default)]
pub struct SilentProgress {
    counters: Counters,
}

impl SilentProgress {
    /// Create a tracker with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Files converted so far
    pub fn converted(&self) -> u64 {
        self.counters.converted.load(Ordering::Relaxed)
    }

    /// Files that failed so far
    pub fn failed(&self) -> u64 {
        self.counters.failed.load(Ordering::Relaxed)
    }

    /// Whether `finish` was called
    pub fn is_finished(&self) -> bool {
        self.counters.finished.load(Ordering::Relaxed)
    }
}

impl ProgressTracker for SilentProgress {
    fn set_total(&self, total: u64) {
        self.counters.total.store(total, Ordering::Relaxed);
    }

    fn file_started(&self, _path: &Path) {}

    fn file_converted(&self, _path: &Path) {
        self.counters.converted.fetch_add(1, Ordering::Relaxed);
    }

    fn file_failed(&self, _path: &Path, _reason: &str) {
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
    }

    fn finish(&self, _message: &str) {
        self.counters.finished.store(true, Ordering::Relaxed);
    }
}

/// Logging progress tracker
///
/// Logs a percentage line roughly ten times per batch and the final
/// summary.
#[derive(Debug)]
pub struct LogProgress {
    name: String,
    counters: Counters,
    /// Only log every N files
    log_interval: AtomicU64,
}

impl LogProgress {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counters: Counters::default(),
            log_interval: AtomicU64::new(1),
        }
    }

    fn advance(&self) {
        let done = self.counters.done();
        let total = self.counters.total.load(Ordering::Relaxed);
        let interval = self.log_interval.load(Ordering::Relaxed).max(1);
        if total > 0 && (done % interval == 0 || done == total) {
            info!("{}: {}% ({}/{})", self.name, done * 100 / total, done, total);
        }
    }
}

impl ProgressTracker for LogProgress {
    fn set_total(&self, total: u64) {
        self.counters.total.store(total, Ordering::Relaxed);
        self.log_interval
            .store(std::cmp::max(1, total / 10), Ordering::Relaxed);
    }

    fn file_started(&self, _path: &Path) {}

    fn file_converted(&self, _path: &Path) {
        self.counters.converted.fetch_add(1, Ordering::Relaxed);
        self.advance();
    }

    fn file_failed(&self, _path: &Path, _reason: &str) {
        self.counters.failed.fetch_add(1, Ordering::Relaxed);
        self.advance();
    }

    fn finish(&self, message: &str) {
        self.counters.finished.store(true, Ordering::Relaxed);
        info!("{}: {}", self.name, message);
    }
}

/// Events emitted by [`CallbackProgress`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Total(u64),
    Started(String),
    Converted(String),
    Failed { path: String, reason: String },
    Finished(String),
}

/// Callback-based progress tracker
///
/// Useful for embedding the converter or for capturing events in tests.
pub struct CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    callback: F,
}

impl<F> CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressTracker for CallbackProgress<F>
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn set_total(&self, total: u64) {
        (self.callback)(ProgressEvent::Total(total));
    }

    fn file_started(&self, path: &Path) {
        (self.callback)(ProgressEvent::Started(path.display().to_string()));
    }

    fn file_converted(&self, path: &Path) {
        (self.callback)(ProgressEvent::Converted(path.display().to_string()));
    }

    fn file_failed(&self, path: &Path, reason: &str) {
        (self.callback)(ProgressEvent::Failed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        });
    }

    fn finish(&self, message: &str) {
        (self.callback)(ProgressEvent::Finished(message.to_string()));
    }
}
