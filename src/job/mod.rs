//! Transfer job definition and remote discovery probes.
//!
//! This module contains the [`TransferJob`] struct describing one parallel
//! download: the source URL, the destination path, and the number of chunks
//! the resource is split into. It also provides the HEAD-based discovery
//! probes the coordinator runs before planning any ranges.
//!
//! # Examples
//!
//! ```rust
//! use rangeload::job::TransferJob;
//! use std::path::PathBuf;
//!
//! let job = TransferJob::try_from("https://example.com/file.zip")?
//!     .with_destination(PathBuf::from("output/file.zip"))
//!     .with_chunk_count(8);
//! assert_eq!(job.chunk_count, 8);
//! # Ok::<(), rangeload::Error>(())
//! ```

use crate::error::Error;

use reqwest::{
    header::{ACCEPT_RANGES, CONTENT_LENGTH},
    Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};

/// Represents one parallel download invocation.
///
/// The job exclusively owns its destination file for the job's lifetime;
/// concurrent fetch tasks are granted non-overlapping write windows into it.
#[derive(Debug, Clone)]
pub struct TransferJob {
    /// URL of the resource to download.
    pub url: Url,
    /// Path the reassembled file is written to.
    pub destination: PathBuf,
    /// Number of byte ranges the resource is split into.
    pub chunk_count: usize,
}

impl TransferJob {
    /// Creates a new [`TransferJob`] with a single chunk.
    ///
    /// When using the [`TransferJob::try_from`] constructors instead, the
    /// destination defaults to the last path segment of the URL.
    pub fn new(url: &Url, destination: &Path) -> Self {
        Self {
            url: url.clone(),
            destination: destination.to_path_buf(),
            chunk_count: 1,
        }
    }

    /// Sets the destination path.
    pub fn with_destination(mut self, destination: PathBuf) -> Self {
        self.destination = destination;
        self
    }

    /// Sets the number of chunks the resource is split into.
    pub fn with_chunk_count(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }

    /// Check whether the remote advertises byte-range support.
    ///
    /// Issues a HEAD request and inspects the `Accept-Ranges` header.
    pub async fn supports_ranges(
        &self,
        client: &ClientWithMiddleware,
    ) -> Result<bool, reqwest_middleware::Error> {
        let res = client.head(self.url.clone()).send().await?;
        let headers = res.headers();
        match headers.get(ACCEPT_RANGES) {
            None => Ok(false),
            Some(x) if x == "none" => Ok(false),
            Some(_) => Ok(true),
        }
    }

    /// Retrieve the content length of the resource.
    ///
    /// Returns None if the `Content-Length` header is missing or if its value
    /// is not an u64.
    pub async fn content_length(
        &self,
        client: &ClientWithMiddleware,
    ) -> Result<Option<u64>, reqwest_middleware::Error> {
        let res = client.head(self.url.clone()).send().await?;
        if !res.status().is_success() {
            return Ok(None);
        }
        let headers = res.headers();
        match headers.get(CONTENT_LENGTH) {
            None => Ok(None),
            Some(header_value) => match header_value.to_str() {
                Ok(v) => match v.parse::<u64>() {
                    Ok(v) => Ok(Some(v)),
                    Err(_) => Ok(None),
                },
                Err(_) => Ok(None),
            },
        }
    }
}

impl TryFrom<&Url> for TransferJob {
    type Error = crate::error::Error;

    fn try_from(value: &Url) -> Result<Self, Self::Error> {
        value
            .path_segments()
            .ok_or_else(|| {
                Error::InvalidUrl(format!(
                    "The url \"{}\" does not contain a valid path",
                    value
                ))
            })?
            .next_back()
            .filter(|name| !name.is_empty())
            .map(|filename| TransferJob {
                url: value.clone(),
                destination: PathBuf::from(filename),
                chunk_count: 1,
            })
            .ok_or_else(|| {
                Error::InvalidUrl(format!("The url \"{}\" does not contain a filename", value))
            })
    }
}

impl TryFrom<&str> for TransferJob {
    type Error = crate::error::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Url::parse(value)
            .map_err(|e| {
                Error::InvalidUrl(format!("The url \"{}\" cannot be parsed: {}", value, e))
            })
            .and_then(|u| TransferJob::try_from(&u))
    }
}
