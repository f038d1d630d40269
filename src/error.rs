//! Error handling for the rangeload library.
//!
//! This module provides centralized error handling for the client side of the
//! crate. Server-side negative outcomes (416, 404) are ordinary HTTP
//! responses, not errors; see [`crate::server`].

use crate::plan::ByteRange;

use std::fmt;
use std::io;
use thiserror::Error;

/// The failure record for a single byte range of a job.
///
/// Per-range failures are collected by the coordinator and surfaced together
/// through [`Error::RangesFailed`] rather than propagated one by one.
#[derive(Debug, Clone)]
pub struct RangeFailure {
    /// The range that could not be transferred.
    pub range: ByteRange,
    /// Human-readable cause.
    pub reason: String,
}

impl fmt::Display for RangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.range, self.reason)
    }
}

/// Errors that can happen when using rangeload.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from the underlying URL parser or the expected URL format.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The requested partition of the resource is impossible.
    ///
    /// Returned when the chunk count is zero, the resource is empty, or there
    /// are more chunks than bytes to spread them over.
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// The size or capability probe against the remote failed.
    ///
    /// A job aborts with this error before any range is planned, e.g. when
    /// the remote does not report a `Content-Length` or does not advertise
    /// range support for a multi-chunk job.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// A single range transfer failed.
    #[error("Range {range} failed: {reason}")]
    Fetch {
        /// The range whose transfer failed.
        range: ByteRange,
        /// Human-readable cause.
        reason: String,
    },

    /// One or more range transfers failed; the job as a whole failed.
    ///
    /// The destination file may contain a correctly-written mixture of ranges
    /// but must be treated as invalid.
    #[error("{} of the job's ranges failed", failed.len())]
    RangesFailed {
        /// Every range that did not complete, with its cause.
        failed: Vec<RangeFailure>,
    },

    /// I/O Error.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
}

/// Result type alias for operations that can fail with a rangeload error.
pub type Result<T> = std::result::Result<T, Error>;
