//! Thread-safe progress accumulation.
//!
//! The [`ProgressReporter`] is the single piece of shared mutable state on
//! the client side. Every concurrent fetch task calls
//! [`ProgressReporter::advance`] with the number of bytes it actually wrote
//! in that step; updates are atomic additions, so the counter is
//! monotonically non-decreasing and, on a successful job, ends exactly at
//! the resource's total size.

use crate::progress::ProgressBarOpts;

use indicatif::ProgressBar;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A read-only view of the transfer's progress.
///
/// Display cadence is visual-only; the snapshot carries no correctness
/// guarantees beyond `transferred` being current at the time of the call.
#[derive(Debug, Clone, Copy)]
pub struct ProgressSnapshot {
    /// Bytes written to the destination so far, across all tasks.
    pub transferred: u64,
    /// Total size of the resource in bytes.
    pub total: u64,
    /// Time elapsed since the reporter was created.
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Completion percentage in `[0.0, 100.0]`.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.transferred as f64 * 100.0 / self.total as f64
    }
}

/// Shared byte counter and progress bar for one download job.
pub struct ProgressReporter {
    transferred: AtomicU64,
    total: u64,
    started: Instant,
    bar: ProgressBar,
    clear_on_finish: bool,
}

impl ProgressReporter {
    /// Create a reporter for a resource of `total` bytes.
    pub fn new(total: u64, opts: &ProgressBarOpts) -> Self {
        Self {
            transferred: AtomicU64::new(0),
            total,
            started: Instant::now(),
            bar: opts.clone().to_progress_bar(total),
            clear_on_finish: opts.clear,
        }
    }

    /// Record `delta` more bytes as transferred.
    ///
    /// Safe to call from any task; the delta must be the actual number of
    /// bytes written in the step, not a nominal buffer size.
    pub fn advance(&self, delta: u64) {
        self.transferred.fetch_add(delta, Ordering::Relaxed);
        self.bar.inc(delta);
    }

    /// Bytes transferred so far.
    pub fn transferred(&self) -> u64 {
        self.transferred.load(Ordering::Relaxed)
    }

    /// Total size of the resource in bytes.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Take a point-in-time snapshot for display purposes.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            transferred: self.transferred(),
            total: self.total,
            elapsed: self.started.elapsed(),
        }
    }

    /// Finish the progress bar, clearing or keeping it per the style options.
    pub fn finish(&self) {
        if self.clear_on_finish {
            self.bar.finish_and_clear();
        } else {
            self.bar.finish();
        }
    }
}
