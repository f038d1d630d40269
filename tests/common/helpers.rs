#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::head,
    Router,
};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rangeload::coordinator::{Coordinator, CoordinatorBuilder};
use rangeload::server::{build_content_range, parse_range_header, RangeServer, ServeConfig, ServerHandle};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;

static TRACING: Once = Once::new();

/// Initializes test logging once, honoring `RUST_LOG`
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates a deterministic pseudo-random byte pattern
pub fn seeded_pattern(size: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut pattern = vec![0u8; size];
    rng.fill_bytes(&mut pattern);
    pattern
}

/// Creates a file with the given content and returns its path
pub fn write_resource(dir: &Path, filename: &str, content: &[u8]) -> PathBuf {
    let file_path = dir.join(filename);
    fs::write(&file_path, content).expect("Failed to write resource file");
    file_path
}

/// Starts an in-process range server over `path` on an ephemeral port,
/// returning the handle and the base URL
pub async fn start_test_server(path: PathBuf) -> (ServerHandle, String) {
    init_tracing();
    let server = RangeServer::new(ServeConfig::new(path));
    let handle = server
        .serve("127.0.0.1:0".parse().expect("Invalid bind address"))
        .await
        .expect("Failed to start test server");
    let base_url = format!("http://{}", handle.local_addr());
    (handle, base_url)
}

async fn staggered_head(State(pattern): State<Arc<Vec<u8>>>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_LENGTH, pattern.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::empty())
        .expect("Failed to build HEAD response")
}

async fn staggered_get(State(pattern): State<Arc<Vec<u8>>>, headers: HeaderMap) -> Response {
    let size = pattern.len() as u64;
    let selector = match headers.get(header::RANGE).and_then(|v| v.to_str().ok()) {
        Some(selector) => selector,
        None => return StatusCode::BAD_REQUEST.into_response(),
    };
    let spec = match parse_range_header(selector, size) {
        Ok(spec) => spec,
        Err(_) => return StatusCode::RANGE_NOT_SATISFIABLE.into_response(),
    };

    // Low offsets wait longest, so the first range reliably finishes last
    // and the file is assembled out of arrival order.
    let delay_ms = 20 + (size - spec.start) * 160 / size;
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;

    let body = pattern[spec.start as usize..=spec.end as usize].to_vec();
    let status = if spec.start > 0 {
        StatusCode::PARTIAL_CONTENT
    } else {
        StatusCode::OK
    };
    Response::builder()
        .status(status)
        .header(header::CONTENT_RANGE, build_content_range(spec, size))
        .header(header::CONTENT_LENGTH, spec.len())
        .body(Body::from(body))
        .expect("Failed to build GET response")
}

/// Starts a range server over an in-memory pattern whose responses are
/// delayed in inverse proportion to the range's start offset
pub async fn start_staggered_server(pattern: Vec<u8>) -> (JoinHandle<()>, String) {
    init_tracing();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    let router = Router::new()
        .route("/resource/streaming", head(staggered_head).get(staggered_get))
        .with_state(Arc::new(pattern));
    let join = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });
    (join, format!("http://{}", addr))
}

/// URL of the plain (non-range-capable) route
pub fn plain_url(base_url: &str) -> String {
    format!("{}/resource", base_url)
}

/// URL of the range-capable streaming route
pub fn streaming_url(base_url: &str) -> String {
    format!("{}/resource/streaming", base_url)
}

/// Creates a coordinator with the progress bar hidden, as tests want it
pub fn hidden_coordinator() -> Coordinator {
    CoordinatorBuilder::hidden().build()
}

/// Asserts that a file exists at the given path
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "File should exist at path: {:?}", path);
}

/// Asserts that a file holds exactly the expected bytes
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let actual = fs::read(path).expect("Failed to read file");
    assert_eq!(
        actual.len(),
        expected.len(),
        "File size mismatch at path: {:?}",
        path
    );
    assert_eq!(actual, expected, "File content mismatch at path: {:?}", path);
}
