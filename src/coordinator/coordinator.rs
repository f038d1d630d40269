//! Core coordinator implementation with the fan-out/join logic.
//!
//! This module contains the [`Coordinator`] struct that orchestrates one
//! parallel download: size and capability discovery, range planning, file
//! preallocation, one concurrent fetch task per range, and a strict join
//! over every task before the job is declared done.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangeload::coordinator::CoordinatorBuilder;
//! use rangeload::job::TransferJob;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = TransferJob::try_from("https://example.com/big.iso")?
//!     .with_destination(PathBuf::from("downloads/big.iso"))
//!     .with_chunk_count(10);
//!
//! let coordinator = CoordinatorBuilder::new().build();
//! let summary = coordinator.download(&job).await?;
//! assert_eq!(summary.bytes_written(), summary.total_size());
//! # Ok(())
//! # }
//! ```

use super::config::CoordinatorConfig;
use crate::error::{Error, RangeFailure, Result};
use crate::fetch::fetch_range;
use crate::http::{create_http_client, HttpClientConfig};
use crate::job::TransferJob;
use crate::plan::plan_ranges;
use crate::progress::ProgressReporter;

use futures::stream::{self, StreamExt};
use std::fmt;
use std::fmt::Debug;
use std::time::Duration;
use tokio::fs::{self, OpenOptions};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Represents the download controller.
///
/// A coordinator can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use rangeload::coordinator::CoordinatorBuilder;
///
/// let c = CoordinatorBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .finish()
    }
}

/// The outcome of a completed download job.
#[derive(Debug, Clone)]
pub struct DownloadSummary {
    total_size: u64,
    bytes_written: u64,
    chunk_count: usize,
    elapsed: Duration,
}

impl DownloadSummary {
    /// Total size of the resource as reported by discovery.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes written across all ranges. Equals [`Self::total_size`] on
    /// success.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of ranges the resource was split into.
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Wall-clock duration of the transfer.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl Coordinator {
    /// Creates a new Coordinator with the given configuration.
    pub(crate) fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    /// Gets the number of retries per range request.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets whether a failed job deletes its partial destination file.
    pub fn remove_partial_on_failure(&self) -> bool {
        self.config.remove_partial_on_failure
    }

    /// Downloads the job's resource in parallel byte ranges.
    ///
    /// Equivalent to [`Self::download_with_cancel`] with a token nobody
    /// cancels.
    pub async fn download(&self, job: &TransferJob) -> Result<DownloadSummary> {
        self.download_with_cancel(job, CancellationToken::new())
            .await
    }

    /// Downloads the job's resource, stopping early if `cancel` fires.
    ///
    /// The sequence is: discovery (size, range capability), range planning,
    /// destination preallocation, one concurrent fetch task per range, then
    /// a strict join over every task. The call returns only after all tasks
    /// have completed or failed; tasks are never fire-and-forgotten.
    ///
    /// # Errors
    ///
    /// - [`Error::Discovery`] when the remote reports no usable size, or a
    ///   multi-chunk job targets a remote without range support.
    /// - [`Error::InvalidPlan`] for degenerate size/chunk-count combinations;
    ///   no file is created in that case.
    /// - [`Error::RangesFailed`] when any range task fails (including by
    ///   cancellation), naming every failed range. The destination file is
    ///   left partially written unless `remove_partial_on_failure` is set,
    ///   and must be treated as invalid either way.
    pub async fn download_with_cancel(
        &self,
        job: &TransferJob,
        cancel: CancellationToken,
    ) -> Result<DownloadSummary> {
        let client = create_http_client(HttpClientConfig {
            retries: self.config.retries,
            proxy: None,
            headers: self.config.headers.clone(),
        })?;

        // Discovery: the size probe must succeed before anything is planned.
        debug!("Probing {} for size and range capability", job.url);
        let total_size = job
            .content_length(&client)
            .await
            .map_err(|e| Error::Discovery(format!("size probe failed: {}", e)))?
            .ok_or_else(|| {
                Error::Discovery("remote did not report a Content-Length".into())
            })?;

        // A single-range job is satisfied by a plain 200; anything more
        // needs the remote to honor range selectors.
        if job.chunk_count > 1 {
            let ranged = job
                .supports_ranges(&client)
                .await
                .map_err(|e| Error::Discovery(format!("capability probe failed: {}", e)))?;
            if !ranged {
                return Err(Error::Discovery(
                    "remote does not advertise byte-range support".into(),
                ));
            }
        }

        // Plan before touching the filesystem, so degenerate jobs never
        // leave a file behind.
        let ranges = plan_ranges(total_size, job.chunk_count)?;

        if let Some(parent) = job.destination.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        // Preallocate to the final size so writers never extend the file
        // and never race on its length.
        debug!("Preallocating {:?} to {} bytes", job.destination, total_size);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&job.destination)
            .await?;
        file.set_len(total_size).await?;
        drop(file);

        let progress = ProgressReporter::new(total_size, &self.config.style);

        debug!("Dispatching {} range tasks", ranges.len());
        let outcomes = stream::iter(ranges.iter().copied())
            .map(|range| {
                let client = &client;
                let progress = &progress;
                let cancel = &cancel;
                let url = &job.url;
                let destination = job.destination.as_path();
                async move {
                    (
                        range,
                        fetch_range(client, url, range, destination, progress, cancel).await,
                    )
                }
            })
            .buffer_unordered(ranges.len())
            // Collecting is the barrier: every task resolves before the job
            // is declared done.
            .collect::<Vec<_>>()
            .await;

        progress.finish();

        let mut bytes_written: u64 = 0;
        let mut failed: Vec<RangeFailure> = Vec::new();
        for (range, outcome) in outcomes {
            match outcome {
                Ok(written) => bytes_written += written,
                Err(Error::Fetch { reason, .. }) => failed.push(RangeFailure { range, reason }),
                Err(other) => failed.push(RangeFailure {
                    range,
                    reason: other.to_string(),
                }),
            }
        }

        if !failed.is_empty() {
            debug!("{} of {} ranges failed", failed.len(), ranges.len());
            if self.config.remove_partial_on_failure {
                if let Err(e) = fs::remove_file(&job.destination).await {
                    debug!("Failed to remove partial file {:?}: {}", job.destination, e);
                }
            }
            return Err(Error::RangesFailed { failed });
        }

        // Every range verified its own length, and the ranges partition the
        // resource, so the sum matches the probed size.
        debug_assert_eq!(bytes_written, total_size);

        let snapshot = progress.snapshot();
        Ok(DownloadSummary {
            total_size,
            bytes_written,
            chunk_count: ranges.len(),
            elapsed: snapshot.elapsed,
        })
    }
}
