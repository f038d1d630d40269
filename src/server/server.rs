//! The range-serving endpoint, its router, and its lifecycle handle.
//!
//! Route surface:
//!
//! - `HEAD /resource` — size discovery: `Content-Length` only.
//! - `HEAD /resource/streaming` — size discovery plus the streaming
//!   capability announcement `Accept-Ranges: bytes`.
//! - `GET /resource` — the full resource, status 200.
//! - `GET /resource/streaming` — honors a `Range: bytes=<start>-<end?>`
//!   selector: 206 (or 200 for a range starting at byte zero) with
//!   `Content-Range`, a `Content-Length` equal to the served span, and a
//!   body bounded at the requested end; 416 for unsatisfiable selectors.
//!
//! A missing resource answers 404 on every route.

use crate::error::Result;
use crate::server::range::{build_content_range, parse_range_header};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::head,
    Router,
};
use chrono::{DateTime, Utc};
use std::io::SeekFrom;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::task::JoinHandle;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
const DEFAULT_READ_BUFFER_SIZE: usize = 1024 * 1024;

/// Configuration for a served resource.
///
/// Metadata (size, modification time) is read fresh from the filesystem on
/// each request; nothing is cached here.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Path of the file being served.
    pub path: PathBuf,
    /// File name advertised in `Content-Disposition`.
    pub filename: String,
    /// Size of the buffers the body is streamed in.
    pub read_buffer_size: usize,
}

impl ServeConfig {
    /// Creates a config for `path`, advertising its file name and streaming
    /// in 1 MiB buffers.
    pub fn new(path: PathBuf) -> Self {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("download"));
        Self {
            path,
            filename,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    /// Overrides the advertised file name.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Overrides the streaming buffer size.
    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size;
        self
    }
}

/// The range-serving HTTP endpoint.
#[derive(Debug, Clone)]
pub struct RangeServer {
    config: Arc<ServeConfig>,
}

/// Handle to a running [`RangeServer`].
///
/// Dropping the handle does not stop the server; call
/// [`ServerHandle::shutdown`] for a graceful stop.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl ServerHandle {
    /// The address the server is actually bound to. Useful with port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Signals the server to stop accepting requests and drain.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Waits until the server task has exited.
    pub async fn stopped(self) {
        let _ = self.join.await;
    }
}

impl RangeServer {
    /// Creates a new [`RangeServer`] for the configured resource.
    pub fn new(config: ServeConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Builds the axum router for the server's route surface.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/resource", head(head_plain).get(get_full))
            .route("/resource/streaming", head(head_streaming).get(get_streaming))
            .with_state(self.config.clone())
    }

    /// Binds `addr` and serves until the handle's shutdown fires.
    ///
    /// Binding port 0 picks an ephemeral port; read it back from
    /// [`ServerHandle::local_addr`].
    pub async fn serve(&self, addr: SocketAddr) -> Result<ServerHandle> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let router = self.router();
        let cancel = CancellationToken::new();

        let shutdown = cancel.clone();
        let join = tokio::spawn(async move {
            debug!("Range server listening on {}", local_addr);
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            debug!("Range server on {} stopped: {:?}", local_addr, result);
        });

        Ok(ServerHandle {
            local_addr,
            cancel,
            join,
        })
    }
}

/// Reads the resource's metadata, turning a missing file into a 404.
async fn stat(config: &ServeConfig) -> std::result::Result<std::fs::Metadata, Response> {
    tokio::fs::metadata(&config.path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND.into_response())
}

/// Formats a filesystem modification time as an RFC-1123 date.
fn last_modified(meta: &std::fs::Metadata) -> Option<String> {
    let modified: DateTime<Utc> = meta.modified().ok()?.into();
    Some(modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

fn response_or_500(
    result: std::result::Result<Response, axum::http::Error>,
) -> Response {
    result.unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// `HEAD /resource`: size discovery.
async fn head_plain(State(config): State<Arc<ServeConfig>>) -> Response {
    let meta = match stat(&config).await {
        Ok(meta) => meta,
        Err(not_found) => return not_found,
    };

    response_or_500(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, meta.len())
            .body(Body::empty()),
    )
}

/// `HEAD /resource/streaming`: size discovery plus the range capability
/// announcement.
async fn head_streaming(State(config): State<Arc<ServeConfig>>) -> Response {
    let meta = match stat(&config).await {
        Ok(meta) => meta,
        Err(not_found) => return not_found,
    };

    response_or_500(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, meta.len())
            .header(header::ACCEPT_RANGES, "bytes")
            .body(Body::empty()),
    )
}

/// `GET /resource`: the full resource, status 200.
async fn get_full(State(config): State<Arc<ServeConfig>>) -> Response {
    let meta = match stat(&config).await {
        Ok(meta) => meta,
        Err(not_found) => return not_found,
    };

    let file = match File::open(&config.path).await {
        Ok(file) => file,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    let stream = ReaderStream::with_capacity(file, config.read_buffer_size);

    response_or_500(
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_LENGTH, meta.len())
            .header(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)
            .body(Body::from_stream(stream)),
    )
}

/// `GET /resource/streaming`: range-aware delivery.
async fn get_streaming(
    State(config): State<Arc<ServeConfig>>,
    headers: HeaderMap,
) -> Response {
    let meta = match stat(&config).await {
        Ok(meta) => meta,
        Err(not_found) => return not_found,
    };
    let size = meta.len();

    let selector = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());

    // No selector: behave like the plain route, with the capability
    // announcement so clients can upgrade to ranged requests.
    let Some(selector) = selector else {
        let file = match File::open(&config.path).await {
            Ok(file) => file,
            Err(_) => return StatusCode::NOT_FOUND.into_response(),
        };
        let stream = ReaderStream::with_capacity(file, config.read_buffer_size);
        return response_or_500(
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_LENGTH, size)
                .header(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::from_stream(stream)),
        );
    };

    let spec = match parse_range_header(selector, size) {
        Ok(spec) => spec,
        Err(e) => {
            debug!("Rejecting range selector '{}': {:?}", selector, e);
            return StatusCode::RANGE_NOT_SATISFIABLE.into_response();
        }
    };

    let mut file = match File::open(&config.path).await {
        Ok(file) => file,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };
    if file.seek(SeekFrom::Start(spec.start)).await.is_err() {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    // Bound the body at the requested end; the reader stops once the span
    // has been served rather than running to end-of-file.
    let stream = ReaderStream::with_capacity(file.take(spec.len()), config.read_buffer_size);

    let status = if spec.start > 0 {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_RANGE, build_content_range(spec, size))
        .header(header::CONTENT_LENGTH, spec.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", config.filename),
        );
    if let Some(date) = last_modified(&meta) {
        builder = builder.header(header::LAST_MODIFIED, date);
    }

    response_or_500(builder.body(Body::from_stream(stream)))
}
