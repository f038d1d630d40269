//! Range-serving HTTP endpoint.
//!
//! This module is the server half of the crate: an axum-based endpoint that
//! answers size discovery (HEAD) and serves full or partial content for GET
//! requests carrying a `Range` header, with correct 200/206/416/404
//! semantics and `Content-Range` construction.
//!
//! Each request is independent and stateless; resource metadata is read
//! fresh from the filesystem every time, with no caching.
//!
//! # Overview
//!
//! - `range` - Range selector parsing and `Content-Range` construction
//! - `server` - The [`RangeServer`], its router, and its lifecycle handle
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangeload::server::{RangeServer, ServeConfig};
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = RangeServer::new(ServeConfig::new(PathBuf::from("data/archive.zip")));
//! let handle = server.serve("127.0.0.1:5555".parse()?).await?;
//! println!("serving on {}", handle.local_addr());
//! handle.stopped().await;
//! # Ok(())
//! # }
//! ```

pub(crate) mod range;
pub(crate) mod server;

pub use range::{build_content_range, parse_range_header, RangeError, RangeSpec};
pub use server::{RangeServer, ServeConfig, ServerHandle};
