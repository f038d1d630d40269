//! Range selector parsing and `Content-Range` construction.
//!
//! The selector grammar accepted here is `bytes=<start>-<end?>`: the start
//! offset is required, the end is optional and defaults to the last byte of
//! the resource. Suffix selectors (`bytes=-N`) are not part of the served
//! surface and are rejected.

use std::fmt;

/// A validated, inclusive byte span `[start, end]` within a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// First byte offset to serve.
    pub start: u64,
    /// Last byte offset to serve (inclusive).
    pub end: u64,
}

// Validation rejects start > end, so a spec always covers at least one byte.
#[allow(clippy::len_without_is_empty)]
impl RangeSpec {
    /// Number of bytes the span covers; this is the `Content-Length` of the
    /// partial response, computed as the actual serving span.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Why a range selector could not be served.
///
/// Both cases are expected negative outcomes reported as a 416 response,
/// never as a crash or an I/O error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// The selector does not follow `bytes=<start>-<end?>`.
    Malformed,
    /// The selector is well-formed but outside the resource
    /// (`start > end` or `start >= size`).
    Unsatisfiable,
}

/// Parses a `Range` request header against a resource of `size` bytes.
///
/// The end offset defaults to `size - 1` when omitted and is clamped to
/// `size - 1` when it points past the resource.
///
/// # Errors
///
/// [`RangeError::Malformed`] for selectors that do not parse,
/// [`RangeError::Unsatisfiable`] for spans outside the resource. Callers
/// answer both with a 416.
pub fn parse_range_header(value: &str, size: u64) -> Result<RangeSpec, RangeError> {
    let value = value.trim();
    let range = value.strip_prefix("bytes=").ok_or(RangeError::Malformed)?;
    let (start_str, end_str) = range.split_once('-').ok_or(RangeError::Malformed)?;

    // The start offset is required.
    let start: u64 = start_str
        .trim()
        .parse()
        .map_err(|_| RangeError::Malformed)?;

    let end = match end_str.trim() {
        "" => size.saturating_sub(1),
        s => {
            let end: u64 = s.parse().map_err(|_| RangeError::Malformed)?;
            end.min(size.saturating_sub(1))
        }
    };

    if start > end || start >= size {
        return Err(RangeError::Unsatisfiable);
    }

    Ok(RangeSpec { start, end })
}

/// Builds a `Content-Range` header value: `bytes <start>-<end>/<size>`.
pub fn build_content_range(spec: RangeSpec, size: u64) -> String {
    format!("bytes {}-{}/{}", spec.start, spec.end, size)
}
