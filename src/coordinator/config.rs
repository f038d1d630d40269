//! Configuration structure and defaults for the coordinator.
//!
//! Everything the coordinator needs flows through this structure; there is
//! no global scheduler or singleton pool. The worker pool lives inside one
//! `download` call and is dropped when the job finishes.

use crate::progress::ProgressBarOpts;

use reqwest::header::HeaderMap;

/// Configuration structure for the coordinator.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// Number of retries per range request.
    pub retries: u32,
    /// Custom HTTP headers.
    pub headers: Option<HeaderMap>,
    /// Progress bar style options.
    pub style: ProgressBarOpts,
    /// Delete the partially-written destination file when the job fails.
    ///
    /// Off by default: the partial file is left in place and the job's error
    /// is the only signal that it is not a valid artifact.
    pub remove_partial_on_failure: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            retries: 0,
            headers: None,
            style: ProgressBarOpts::default(),
            remove_partial_on_failure: false,
        }
    }
}
