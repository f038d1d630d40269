//! HTTP client module.
//!
//! Provides the middleware-wrapped client every probe and range fetch goes
//! through: tracing, retry with exponential backoff, optional proxy and
//! default headers.

pub mod client;

pub use client::{create_http_client, HttpClientConfig};
