//! Byte-range planning.
//!
//! This module partitions a resource of known size into contiguous,
//! non-overlapping, inclusive byte ranges. The partition is what the
//! coordinator fans out over: each range becomes one concurrent fetch task
//! writing into its own region of the destination file.
//!
//! # Examples
//!
//! ```rust
//! use rangeload::plan::plan_ranges;
//!
//! let ranges = plan_ranges(100, 3)?;
//! assert_eq!(ranges.len(), 3);
//! assert_eq!(ranges[0].start, 0);
//! assert_eq!(ranges[2].end, 99);
//! # Ok::<(), rangeload::Error>(())
//! ```

use crate::error::{Error, Result};

use std::fmt;

/// A contiguous, inclusive byte interval `[start, end]` of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte offset covered by the range.
    pub start: u64,
    /// Last byte offset covered by the range (inclusive).
    pub end: u64,
}

// Inclusive bounds make a range of at least one byte; there is no empty case.
#[allow(clippy::len_without_is_empty)]
impl ByteRange {
    /// Creates a new [`ByteRange`].
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// Number of bytes covered by the range.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// The request header value selecting this range: `bytes=<start>-<end>`.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Partitions `[0, total_size - 1]` into `chunk_count` ranges.
///
/// Ranges are produced in ascending order, are pairwise disjoint, and their
/// union covers the resource exactly. Every range except the last spans
/// `total_size / chunk_count` bytes; the last one absorbs the remainder of
/// the integer division and may therefore be larger than the others.
///
/// Fully deterministic given the same inputs.
///
/// # Errors
///
/// Returns [`Error::InvalidPlan`] when `chunk_count` is zero, `total_size`
/// is zero, or `chunk_count` exceeds `total_size` (some ranges would be
/// empty).
pub fn plan_ranges(total_size: u64, chunk_count: usize) -> Result<Vec<ByteRange>> {
    if chunk_count == 0 {
        return Err(Error::InvalidPlan("chunk count must be at least 1".into()));
    }
    if total_size == 0 {
        return Err(Error::InvalidPlan("resource size must be non-zero".into()));
    }
    if chunk_count as u64 > total_size {
        return Err(Error::InvalidPlan(format!(
            "cannot split {} bytes into {} chunks",
            total_size, chunk_count
        )));
    }

    let base = total_size / chunk_count as u64;
    let mut ranges: Vec<ByteRange> = (0..chunk_count as u64)
        .map(|i| ByteRange::new(i * base, (i + 1) * base - 1))
        .collect();

    // The last range absorbs the division remainder.
    if let Some(last) = ranges.last_mut() {
        last.end = total_size - 1;
    }

    Ok(ranges)
}
