//! Error types for the pdfstitch library.
//!
//! One closed enum covers every failure cause the pipeline can hit, so
//! callers and tests can match on structure instead of pattern-matching
//! message text. Two broad families exist:
//!
//! * **Fatal for a conversion** — bad input path, download failure, corrupt
//!   PDF, encoding failure. Returned as `Err(StitchError)` from the
//!   top-level `convert*` functions.
//!
//! * **Batch-level validation** — [`StitchError::DirectoryNotFound`] and
//!   [`StitchError::NoPdfFiles`] abort a batch before any file is touched.
//!   A failure inside one file of a batch is NOT fatal to the batch: it is
//!   recorded in the per-file [`crate::output::ConversionReport`] and the
//!   remaining files are still processed.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdfstitch library.
#[derive(Debug, Error)]
pub enum StitchError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck the URL and your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error while rendering a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the pdfstitch executable, or install it as a\n\
system library. Pre-built binaries: https://github.com/bblanchon/pdfium-binaries"
    )]
    PdfiumBindingFailed(String),

    // ── Stitching errors ──────────────────────────────────────────────────
    /// The stitcher was handed an empty page sequence.
    ///
    /// This is a contract violation: a successfully rasterised PDF always
    /// has at least one page, so normal pipeline paths never hit it.
    #[error("Cannot stitch an empty image sequence")]
    EmptyPageSequence,

    // ── Batch errors ──────────────────────────────────────────────────────
    /// Batch mode was pointed at a directory that does not exist.
    #[error("Directory not found: '{path}'")]
    DirectoryNotFound { path: PathBuf },

    /// Batch mode found no `*.pdf` files in the directory.
    #[error("No PDF files found in directory: '{path}'")]
    NoPdfFiles { path: PathBuf },

    // ── Output errors ─────────────────────────────────────────────────────
    /// The image codec rejected the composite or the target format.
    #[error("Failed to encode image for '{path}': {detail}")]
    EncodingFailed { path: PathBuf, detail: String },

    /// Could not create or write the output image file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_not_found_display_names_the_path() {
        let e = StitchError::FileNotFound {
            path: PathBuf::from("/tmp/missing.pdf"),
        };
        assert!(e.to_string().contains("/tmp/missing.pdf"));
    }

    #[test]
    fn download_timeout_display() {
        let e = StitchError::DownloadTimeout {
            url: "https://example.com/doc.pdf".into(),
            secs: 30,
        };
        let msg = e.to_string();
        assert!(msg.contains("30s"), "got: {msg}");
        assert!(msg.contains("example.com"));
    }

    #[test]
    fn rasterisation_failed_display_names_the_page() {
        let e = StitchError::RasterisationFailed {
            page: 7,
            detail: "bad content stream".into(),
        };
        assert!(e.to_string().contains("page 7"));
    }

    #[test]
    fn output_write_failed_preserves_source() {
        use std::error::Error as _;
        let e = StitchError::OutputWriteFailed {
            path: PathBuf::from("/out/x.png"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(e.source().is_some());
    }
}
