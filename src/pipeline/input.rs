//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp directory?
//!
//! pdfium needs a file-system path — it cannot stream from a socket. A
//! fresh `TempDir` per invocation gives the download a collision-free
//! location, and carrying the handle inside [`ResolvedInput::Downloaded`]
//! guarantees removal when the value drops — after success, after a
//! handled failure, and during a panic unwind alike. The PDF magic bytes
//! (`%PDF`) are validated before returning so callers get a meaningful
//! error instead of a pdfium parse failure on an HTML error page.

use crate::error::StitchError;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the PDF lives in a per-invocation temp directory
    /// that is removed when this value drops.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }

    /// Whether this input was fetched over HTTP.
    pub fn is_downloaded(&self) -> bool {
        matches!(self, ResolvedInput::Downloaded { .. })
    }
}

/// Check whether the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve an input string to a local PDF file.
///
/// URLs are downloaded into a scoped temp directory; local paths are
/// validated for existence, readability, and PDF magic bytes.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, StitchError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(Path::new(input))
    }
}

fn resolve_local(path: &Path) -> Result<ResolvedInput, StitchError> {
    if !path.exists() {
        return Err(StitchError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut file = match std::fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(StitchError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(StitchError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    check_magic(&mut file, path)?;

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path.to_path_buf()))
}

/// Reject files that do not start with `%PDF`.
fn check_magic(file: &mut std::fs::File, path: &Path) -> Result<(), StitchError> {
    use std::io::Read;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(StitchError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}

/// Download a URL into a fresh temp directory and return the scoped handle.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, StitchError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| StitchError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let classify = |e: reqwest::Error| {
        if e.is_timeout() {
            StitchError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            StitchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    };

    let response = client.get(url).send().await.map_err(&classify)?;

    if !response.status().is_success() {
        return Err(StitchError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let temp_dir = TempDir::new().map_err(|e| StitchError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename_from_url(url));

    // Stream the body to disk chunk by chunk instead of buffering the
    // whole document in memory.
    let mut file = tokio::fs::File::create(&file_path)
        .await
        .map_err(|e| StitchError::Internal(format!("Failed to create temp file: {e}")))?;
    let mut stream = response.bytes_stream();
    let mut magic = [0u8; 4];
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(&classify)?;
        for (i, byte) in chunk.iter().enumerate() {
            let pos = written as usize + i;
            if pos < 4 {
                magic[pos] = *byte;
            } else {
                break;
            }
        }
        written += chunk.len() as u64;
        file.write_all(&chunk)
            .await
            .map_err(|e| StitchError::Internal(format!("Failed to write temp file: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| StitchError::Internal(format!("Failed to flush temp file: {e}")))?;

    if written >= 4 && &magic != b"%PDF" {
        return Err(StitchError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    info!("Downloaded {} bytes to: {}", written, file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Derive a file name from the last path segment of the URL.
fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }
    "downloaded.pdf".to_string()
}
