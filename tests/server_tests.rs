//! HTTP surface tests for the range-serving endpoint.
//!
//! These drive a real server on an ephemeral port with a plain reqwest
//! client and assert the exact status codes and headers of the contract.

mod common;
use common::helpers::*;

use reqwest::header::{
    ACCEPT_RANGES, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_RANGE, LAST_MODIFIED, RANGE,
};
use reqwest::StatusCode;
use tempfile::TempDir;

const RESOURCE_SIZE: usize = 1000;

/// The directory guard must outlive the requests, so it rides along.
async fn start_thousand_byte_server() -> (TempDir, rangeload::ServerHandle, String, Vec<u8>) {
    let temp_dir = create_temp_dir();
    let pattern = seeded_pattern(RESOURCE_SIZE, 42);
    let path = write_resource(temp_dir.path(), "resource.bin", &pattern);
    let (handle, base_url) = start_test_server(path).await;
    (temp_dir, handle, base_url, pattern)
}

#[tokio::test]
async fn test_head_plain_reports_size_only() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client.head(plain_url(&base_url)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LENGTH], "1000");
    assert!(response.headers().get(ACCEPT_RANGES).is_none());

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_head_streaming_announces_range_support() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client.head(streaming_url(&base_url)).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LENGTH], "1000");
    assert_eq!(response.headers()[ACCEPT_RANGES], "bytes");

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_get_without_range_returns_full_body() {
    let (_dir, handle, base_url, pattern) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client.get(plain_url(&base_url)).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LENGTH], "1000");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &pattern[..]);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_open_ended_range_serves_the_tail() {
    let (_dir, handle, base_url, pattern) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=500-")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[CONTENT_LENGTH], "500");
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes 500-999/1000");
    assert_eq!(response.headers()[ACCEPT_RANGES], "bytes");

    let body = response.bytes().await.unwrap();
    assert_eq!(body.len(), 500);
    assert_eq!(body.as_ref(), &pattern[500..]);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_range_starting_at_zero_answers_200() {
    let (_dir, handle, base_url, pattern) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=0-499")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_LENGTH], "500");
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes 0-499/1000");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &pattern[..500]);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_body_is_bounded_at_the_requested_end() {
    let (_dir, handle, base_url, pattern) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=10-19")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[CONTENT_LENGTH], "10");
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes 10-19/1000");

    let body = response.bytes().await.unwrap();
    assert_eq!(body.len(), 10, "body must stop at the requested end");
    assert_eq!(body.as_ref(), &pattern[10..20]);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_partial_response_carries_attachment_headers() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=100-199")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers()[CONTENT_DISPOSITION],
        "attachment; filename=\"resource.bin\""
    );
    // RFC-1123 dates end in "GMT".
    let last_modified = response.headers()[LAST_MODIFIED].to_str().unwrap();
    assert!(last_modified.ends_with("GMT"), "got '{}'", last_modified);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_out_of_bounds_range_is_416_with_empty_body() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=1001-1050")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);
    assert!(response.bytes().await.unwrap().is_empty());

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_inverted_range_is_416() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=300-200")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_malformed_selector_is_416() {
    let (_dir, handle, base_url, _) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=abc-def")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::RANGE_NOT_SATISFIABLE);

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_missing_resource_is_404() {
    let temp_dir = create_temp_dir();
    let missing = temp_dir.path().join("does-not-exist.bin");
    let (handle, base_url) = start_test_server(missing).await;
    let client = reqwest::Client::new();

    for url in [plain_url(&base_url), streaming_url(&base_url)] {
        let response = client.get(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", url);

        let response = client.head(&url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "HEAD {}", url);
    }

    handle.shutdown();
    handle.stopped().await;
}

#[tokio::test]
async fn test_end_past_resource_is_clamped() {
    let (_dir, handle, base_url, pattern) = start_thousand_byte_server().await;
    let client = reqwest::Client::new();

    let response = client
        .get(streaming_url(&base_url))
        .header(RANGE, "bytes=900-5000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[CONTENT_RANGE], "bytes 900-999/1000");
    assert_eq!(response.bytes().await.unwrap().as_ref(), &pattern[900..]);

    handle.shutdown();
    handle.stopped().await;
}
