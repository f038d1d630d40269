//! Progress accumulation and display.
//!
//! This module provides the shared, thread-safe progress counter every
//! concurrent fetch task reports into, plus the styling options for the
//! progress bar drawn while a job runs.
//!
//! # Overview
//!
//! - `reporter` - Shared byte counter, snapshots, and bar updates
//! - `style` - Progress bar styling options and templates
//!
//! # Examples
//!
//! ```rust
//! use rangeload::progress::{ProgressBarOpts, ProgressReporter};
//!
//! let reporter = ProgressReporter::new(1024, &ProgressBarOpts::hidden());
//! reporter.advance(512);
//! let snapshot = reporter.snapshot();
//! assert_eq!(snapshot.transferred, 512);
//! assert_eq!(snapshot.percent(), 50.0);
//! ```

pub(crate) mod reporter;
pub(crate) mod style;

pub use reporter::{ProgressReporter, ProgressSnapshot};
pub use style::ProgressBarOpts;
