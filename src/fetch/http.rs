//! Streaming file download with bounded redirect handling
//!
//! The agent is built with automatic redirects disabled so the hop loop is
//! explicit: at most [`MAX_REDIRECT_HOPS`] redirects are followed, and a
//! longer chain fails with a distinct error instead of looping forever.
//! A failed download never leaves a partial file at the destination.

use crate::output;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP timeout in seconds
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// Maximum redirect hops before a download fails.
pub const MAX_REDIRECT_HOPS: usize = 5;

/// Read/write chunk size for streaming to disk.
const CHUNK_SIZE: usize = 8192;

/// Get HTTP timeout from environment variable or use default.
/// Cached for performance (only reads env var once).
fn http_timeout() -> Duration {
    static TIMEOUT: OnceLock<Duration> = OnceLock::new();
    *TIMEOUT.get_or_init(|| {
        let secs = std::env::var("DEPFETCH_HTTP_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
        // Clamp to reasonable range (5-300 seconds)
        Duration::from_secs(secs.clamp(5, 300))
    })
}

/// Build the shared agent: redirects handled manually, timeout from env.
pub fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .redirects(0)
        .timeout(http_timeout())
        .build()
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("too many redirects (limit {MAX_REDIRECT_HOPS}) fetching {0}")]
    TooManyRedirects(String),

    #[error("redirect from {0} has no Location header")]
    MissingLocation(String),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("request failed for {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Download `url` to `dest`, following up to [`MAX_REDIRECT_HOPS`]
/// redirects. Returns the number of bytes written. On any failure the
/// destination file is removed.
pub fn download(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<u64, DownloadError> {
    ensure_parent_dir(dest)?;

    let result = follow_and_stream(agent, url, dest);
    if result.is_err() {
        let _ = std::fs::remove_file(dest);
    }
    result
}

fn follow_and_stream(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<u64, DownloadError> {
    let mut current = url.to_string();

    for _hop in 0..=MAX_REDIRECT_HOPS {
        let response = match agent.get(&current).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(DownloadError::HttpStatus {
                    status,
                    url: current,
                });
            }
            Err(e) => {
                return Err(DownloadError::Transport {
                    url: current,
                    reason: e.to_string(),
                });
            }
        };

        match response.status() {
            301 | 302 | 303 | 307 | 308 => {
                let location = response
                    .header("location")
                    .ok_or_else(|| DownloadError::MissingLocation(current.clone()))?;
                current = resolve_location(&current, location);
            }
            200..=299 => return stream_to_file(response, dest),
            // ureq reports some non-redirect statuses (304, 300) as Ok;
            // anything without a downloadable body is a failure.
            status => {
                return Err(DownloadError::HttpStatus {
                    status,
                    url: current,
                });
            }
        }
    }

    Err(DownloadError::TooManyRedirects(url.to_string()))
}

/// Stream the response body to disk with a progress bar. The bar starts as
/// a spinner and upgrades to a byte bar when Content-Length is declared.
fn stream_to_file(response: ureq::Response, dest: &Path) -> Result<u64, DownloadError> {
    let filename = dest
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "download".to_string());

    let pb = output::download_spinner(&format!("downloading {}", filename));
    if let Some(len) = response
        .header("content-length")
        .and_then(|s| s.parse().ok())
    {
        output::upgrade_to_bytes(&pb, len);
    }

    let io_err = |source| DownloadError::Io {
        path: dest.to_path_buf(),
        source,
    };

    let result = (|| {
        let mut file = std::fs::File::create(dest).map_err(io_err)?;
        let mut reader = response.into_reader();
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(io_err)?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read]).map_err(io_err)?;
            total_bytes += bytes_read as u64;
            pb.set_position(total_bytes);
        }

        Ok(total_bytes)
    })();

    pb.finish_and_clear();
    result
}

/// Resolve a Location header value against the URL that produced it.
/// Handles absolute URLs, host-relative (`/path`) and path-relative forms.
fn resolve_location(base: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }

    if let Some(scheme_end) = base.find("://") {
        let after_scheme = scheme_end + 3;
        let path_start = base[after_scheme..]
            .find('/')
            .map(|i| after_scheme + i)
            .unwrap_or(base.len());
        let origin = &base[..path_start];

        if location.starts_with('/') {
            return format!("{}{}", origin, location);
        }

        // Path-relative: replace the last segment of the base path
        let dir_end = base.rfind('/').unwrap_or(path_start);
        let dir = &base[..dir_end.max(path_start)];
        return format!("{}/{}", dir, location);
    }

    location.to_string()
}

fn ensure_parent_dir(path: &Path) -> Result<(), DownloadError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|source| DownloadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}
