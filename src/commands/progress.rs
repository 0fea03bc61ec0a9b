// src/commands/progress.rs
//! Terminal progress bar for batch conversion
//!
//! Shows an overall bar with the file currently being converted as its
//! message. Failures are reported through logging, not on the bar.

use indicatif::{ProgressBar, ProgressStyle};
use native2ascii::ProgressTracker;
use std::path::Path;
use std::time::Duration;

/// indicatif-backed [`ProgressTracker`]
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    /// Create a progress bar on stderr
    pub fn new(operation: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{prefix} ({pos}/{len}) [{bar:40.green/dim}] {percent}% {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        bar.set_prefix(operation.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    #[cfg(test)]
    fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Finish with a failure message, leaving the bar where it stopped
    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }
}

impl ProgressTracker for CliProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn file_started(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.bar.set_message(name);
    }

    fn file_converted(&self, _path: &Path) {
        self.bar.inc(1);
    }

    fn file_failed(&self, _path: &Path, _reason: &str) {
        self.bar.inc(1);
    }

    fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }
}
