//! Rangeload is a crate for parallel byte-range HTTP downloads: it splits a
//! remote file into disjoint byte ranges, fetches them concurrently, and
//! reassembles them into a single file on disk without corruption. It also
//! ships the matching server side, an endpoint that answers byte-range
//! requests with correct 200/206/416/404 semantics.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use rangeload::{job::TransferJob, coordinator::CoordinatorBuilder, Error};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let job = TransferJob::try_from("https://example.com/archive.zip")?
//!     .with_destination(PathBuf::from("output/archive.zip"))
//!     .with_chunk_count(10);
//! let coordinator = CoordinatorBuilder::new().build();
//! let summary = coordinator.download(&job).await?;
//! assert_eq!(summary.bytes_written(), summary.total_size());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`plan`] - Partitioning a resource into disjoint byte ranges
//! - [`job`] - The `TransferJob` definition and remote discovery probes
//! - [`fetch`] - Fetching one range into its window of the destination file
//! - [`coordinator`] - The `Coordinator` orchestrating a whole job
//! - [`progress`] - Thread-safe progress accumulation and display
//! - [`http`] - HTTP client creation and middleware configuration
//! - [`server`] - The range-serving endpoint
//! - [`error`] - Centralized error handling with the `Error` enum

pub mod coordinator;
pub mod error;
pub mod fetch;
pub mod http;
pub mod job;
pub mod plan;
pub mod progress;
pub mod server;

pub use coordinator::{Coordinator, CoordinatorBuilder, DownloadSummary};
pub use error::{Error, RangeFailure, Result};
pub use fetch::fetch_range;
pub use http::{create_http_client, HttpClientConfig};
pub use job::TransferJob;
pub use plan::{plan_ranges, ByteRange};
pub use progress::{ProgressBarOpts, ProgressReporter, ProgressSnapshot};
pub use server::{RangeServer, ServeConfig, ServerHandle};
