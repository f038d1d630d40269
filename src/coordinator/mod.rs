//! Coordinator module containing the parallel download orchestration,
//! builder pattern, and configuration.
//!
//! # Overview
//!
//! The coordinator module is organized into three main components:
//!
//! - `coordinator` - Core Coordinator struct with the fan-out/join logic
//! - `builder` - CoordinatorBuilder for flexible configuration
//! - `config` - Configuration structure and defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangeload::coordinator::CoordinatorBuilder;
//! use rangeload::job::TransferJob;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = TransferJob::try_from("https://example.com/file.zip")?
//!     .with_destination(PathBuf::from("output/file.zip"))
//!     .with_chunk_count(8);
//!
//! let coordinator = CoordinatorBuilder::new().retries(3).build();
//! let summary = coordinator.download(&job).await?;
//! println!("{} bytes in {:?}", summary.bytes_written(), summary.elapsed());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod coordinator;

pub use builder::CoordinatorBuilder;
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, DownloadSummary};
