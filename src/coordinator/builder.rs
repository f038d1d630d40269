//! Builder pattern implementation for creating Coordinator instances.
//!
//! # Examples
//!
//! ## Basic Builder Usage
//!
//! ```rust
//! use rangeload::coordinator::CoordinatorBuilder;
//!
//! let coordinator = CoordinatorBuilder::new().retries(3).build();
//! ```
//!
//! ## Hidden Progress Bar
//!
//! ```rust
//! use rangeload::coordinator::CoordinatorBuilder;
//!
//! // Create a coordinator with no visible progress bar
//! let coordinator = CoordinatorBuilder::hidden().build();
//! ```

use super::{config::CoordinatorConfig, coordinator::Coordinator};
use crate::progress::ProgressBarOpts;

use reqwest::header::{HeaderMap, HeaderValue, IntoHeaderName};

/// A builder used to create a [`Coordinator`].
///
/// ```rust
/// # fn main()  {
/// use rangeload::coordinator::CoordinatorBuilder;
///
/// let c = CoordinatorBuilder::new().retries(5).build();
/// # }
/// ```
#[derive(Default)]
pub struct CoordinatorBuilder {
    config: CoordinatorConfig,
}

impl CoordinatorBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        CoordinatorBuilder::default()
    }

    /// Convenience function to hide the progress bar.
    pub fn hidden() -> Self {
        let mut builder = CoordinatorBuilder::default();
        builder.config.style = ProgressBarOpts::hidden();
        builder
    }

    /// Set the number of retries per range request.
    ///
    /// Defaults to zero: a transport failure fails the range on the first
    /// attempt. Retries ride the HTTP client's exponential-backoff
    /// middleware.
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the progress bar style options.
    pub fn style(mut self, style: ProgressBarOpts) -> Self {
        self.config.style = style;
        self
    }

    /// Delete the partially-written destination file when the job fails.
    pub fn remove_partial_on_failure(mut self, remove: bool) -> Self {
        self.config.remove_partial_on_failure = remove;
        self
    }

    /// Helper method to get or create a new HeaderMap.
    fn new_header(&self) -> HeaderMap {
        match self.config.headers {
            Some(ref h) => h.to_owned(),
            _ => HeaderMap::new(),
        }
    }

    /// Add the http headers.
    ///
    /// You need to pass in a `HeaderMap`, not a `HeaderName`.
    /// `HeaderMap` is a set of http headers.
    ///
    /// You can call `.headers()` multiple times and all `HeaderMap` will be
    /// merged into a single one.
    ///
    /// # Example
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue, HeaderMap};
    /// use rangeload::coordinator::CoordinatorBuilder;
    ///
    /// let ua = HeaderValue::from_str("curl/7.87").expect("Invalid UA");
    ///
    /// let builder = CoordinatorBuilder::new()
    ///     .headers(HeaderMap::from_iter([(header::USER_AGENT, ua)]))
    ///     .build();
    /// ```
    ///
    /// See also [`header()`].
    ///
    /// [`header()`]: CoordinatorBuilder::header
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        let mut new = self.new_header();
        new.extend(headers);

        self.config.headers = Some(new);
        self
    }

    /// Add the http header
    ///
    /// # Example
    ///
    /// You can use the `.header()` chain to add multiple headers
    ///
    /// ```
    /// use reqwest::header::{self, HeaderValue};
    /// use rangeload::coordinator::CoordinatorBuilder;
    ///
    /// let ua = HeaderValue::from_str("curl/7.87").expect("Invalid UA");
    /// let auth = HeaderValue::from_str("Basic aGk6MTIzNDU2Cg==").expect("Invalid auth");
    ///
    /// let builder = CoordinatorBuilder::new()
    ///     .header(header::USER_AGENT, ua)
    ///     .header(header::AUTHORIZATION, auth)
    ///     .build();
    /// ```
    ///
    /// If you need to pass in a `HeaderMap`, instead of calling `.header()`
    /// multiple times. See also [`headers()`].
    ///
    /// [`headers()`]: CoordinatorBuilder::headers
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        let mut new = self.new_header();

        new.insert(name, value);

        self.config.headers = Some(new);
        self
    }

    /// Create the [`Coordinator`] with the specified options.
    pub fn build(self) -> Coordinator {
        Coordinator::new(self.config)
    }
}
