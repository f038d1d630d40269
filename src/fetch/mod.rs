//! Single byte-range transfer.
//!
//! This module performs one HTTP GET for one byte range and streams the
//! response body into the destination file at the range's offset. The file
//! is expected to already exist at its final size (the coordinator
//! preallocates it), so the writer only seeks and writes inside its own
//! window and never extends the file.
//!
//! Status discipline: a `206 Partial Content` is always accepted; a plain
//! `200 OK` is accepted only when the range starts at byte zero, because a
//! 200 for a non-zero start means the remote ignored the range selector and
//! would corrupt the file if written at the offset.

use crate::error::{Error, Result};
use crate::plan::ByteRange;
use crate::progress::ProgressReporter;

use futures::StreamExt;
use reqwest::{
    header::{self, HeaderMap},
    StatusCode, Url,
};
use reqwest_middleware::ClientWithMiddleware;
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncSeekExt, AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::debug;

const WRITE_BUFFER_SIZE: usize = 512 * 1024;

/// Fetches one byte range of `url` into `destination` at the range's offset.
///
/// Streams the body in transport-sized increments, writing each one at the
/// running offset and reporting its actual length to `progress`. Returns the
/// number of bytes written, which on success always equals `range.len()`.
///
/// # Errors
///
/// Fails with [`Error::Fetch`] carrying the range identity when the request
/// cannot be sent, the remote answers with an unusable status, the
/// `Content-Range` echo does not match the request, the stream delivers too
/// many or too few bytes, a write fails, or `cancel` fires mid-transfer.
pub async fn fetch_range(
    client: &ClientWithMiddleware,
    url: &Url,
    range: ByteRange,
    destination: &Path,
    progress: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<u64> {
    let fail = |reason: String| Error::Fetch { range, reason };
    let expected_len = range.len();

    debug!("Fetching range {} of {}", range, url);
    let request = client
        .get(url.clone())
        .header(header::RANGE, range.header_value());

    let response = tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            return Err(fail("cancelled before the request was sent".into()));
        }

        result = request.send() => {
            result.map_err(|e| fail(format!("request failed: {}", e)))?
        }
    };

    let status = response.status();
    if status == StatusCode::OK && range.start > 0 {
        return Err(fail(format!(
            "remote ignored the range selector (200 for a range starting at {})",
            range.start
        )));
    }
    if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
        return Err(fail(format!("unexpected status {}", status)));
    }
    if status == StatusCode::PARTIAL_CONTENT {
        validate_content_range(response.headers(), range).map_err(fail)?;
    }

    let file = OpenOptions::new()
        .write(true)
        .open(destination)
        .await
        .map_err(|e| fail(format!("failed to open {:?}: {}", destination, e)))?;
    let mut file = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    file.seek(SeekFrom::Start(range.start))
        .await
        .map_err(|e| fail(format!("failed to seek to offset {}: {}", range.start, e)))?;

    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(item) = stream.next().await {
        if cancel.is_cancelled() {
            file.flush().await.ok();
            return Err(fail(format!("cancelled after {} bytes", bytes_written)));
        }

        let chunk = item.map_err(|e| fail(format!("stream error at byte {}: {}", bytes_written, e)))?;
        let chunk_size = chunk.len() as u64;

        if bytes_written + chunk_size > expected_len {
            file.flush().await.ok();
            return Err(fail(format!(
                "remote sent excess data: expected {} bytes, got at least {}",
                expected_len,
                bytes_written + chunk_size
            )));
        }

        file.write_all(&chunk)
            .await
            .map_err(|e| fail(format!(
                "write failed at offset {}: {}",
                range.start + bytes_written,
                e
            )))?;

        bytes_written += chunk_size;
        // Report the increment's actual length, so the aggregate ends at
        // exactly the resource's total size.
        progress.advance(chunk_size);
    }

    file.flush()
        .await
        .map_err(|e| fail(format!("flush failed: {}", e)))?;

    if bytes_written != expected_len {
        return Err(fail(format!(
            "truncated transfer: expected {} bytes, wrote {}",
            expected_len, bytes_written
        )));
    }

    debug!("Range {} complete ({} bytes)", range, bytes_written);
    Ok(bytes_written)
}

/// Checks that a 206 response's `Content-Range` matches the requested range.
fn validate_content_range(
    headers: &HeaderMap,
    range: ByteRange,
) -> std::result::Result<(), String> {
    let value = headers
        .get(header::CONTENT_RANGE)
        .ok_or_else(|| "206 response without Content-Range".to_string())?
        .to_str()
        .map_err(|_| "Content-Range is not valid UTF-8".to_string())?;

    let rest = value
        .strip_prefix("bytes ")
        .ok_or_else(|| format!("unexpected Content-Range format: '{}'", value))?;

    let (range_part, _total) = rest
        .split_once('/')
        .ok_or_else(|| format!("Content-Range missing '/': '{}'", value))?;

    let (start_str, end_str) = range_part
        .split_once('-')
        .ok_or_else(|| format!("Content-Range missing '-': '{}'", value))?;

    let actual_start: u64 = start_str
        .parse()
        .map_err(|_| format!("invalid start in Content-Range: '{}'", value))?;
    let actual_end: u64 = end_str
        .parse()
        .map_err(|_| format!("invalid end in Content-Range: '{}'", value))?;

    if actual_start != range.start || actual_end != range.end {
        return Err(format!(
            "Content-Range mismatch: requested {}, got '{}'",
            range, value
        ));
    }

    Ok(())
}
