//! Conversion entry points: single file or URL, and batch directories.
//!
//! Every stage runs strictly in sequence — resolve, rasterise, stitch,
//! encode — and batch mode walks its files one at a time. The pipeline
//! holds one document's pages in memory at a time and its behaviour is
//! deterministic for identical inputs; there is no hidden parallelism to
//! trade that away for throughput.

use crate::config::ConvertConfig;
use crate::error::StitchError;
use crate::output::{format_file_size, BatchOutcome, ConversionOutcome, ConversionReport, FileReport};
use crate::pipeline::{encode, input, render};
use crate::stitch::stitch_pages;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Convert a PDF file or URL into a single stitched image.
///
/// This is the primary entry point for the library. URL inputs are
/// downloaded to a per-invocation temp directory that is removed when the
/// call returns, on success and failure alike.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL of a PDF
/// * `output`    — Target image path; `None` derives `<stem>_stitched.png`
///   beside a local input, or in the current directory for URL inputs
/// * `config`    — Conversion configuration
///
/// # Errors
/// Any [`StitchError`] from input resolution, rasterisation, stitching, or
/// encoding. Nothing is written on failure.
pub async fn convert(
    input_str: impl AsRef<str>,
    output: Option<&Path>,
    config: &ConvertConfig,
) -> Result<ConversionOutcome, StitchError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    // `resolved` owns any downloaded temp file; keep it alive until the
    // composite has been written.
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let pages = render::render_pdf(&pdf_path, config).await?;
    info!(
        "Rendered {} pages in {}ms",
        pages.len(),
        render_start.elapsed().as_millis()
    );

    // ── Step 3: Stitch ───────────────────────────────────────────────────
    let composite = stitch_pages(&pages, config.spacing, config.background_pixel())?;
    let (width, height) = composite.dimensions();
    let page_count = pages.len();
    drop(pages);

    // ── Step 4: Determine output path ────────────────────────────────────
    let output_path = resolve_output_path(output, &resolved)?;
    debug!("Output path: {}", output_path.display());

    // ── Step 5: Encode and persist ───────────────────────────────────────
    let size_bytes = encode::encode_and_write(composite, &output_path, config.quality).await?;
    let (file_size_mb, file_size_str) = format_file_size(size_bytes);

    let output_path = std::fs::canonicalize(&output_path).unwrap_or(output_path);

    info!(
        "Conversion complete: {} pages → {}x{} px, {} ({}ms total)",
        page_count,
        width,
        height,
        file_size_str,
        total_start.elapsed().as_millis()
    );

    Ok(ConversionOutcome {
        output_path,
        file_size_mb,
        file_size_str,
        pages: page_count,
        width,
        height,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    output: Option<&Path>,
    config: &ConvertConfig,
) -> Result<ConversionOutcome, StitchError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| StitchError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_str, output, config))
}

/// Convert every `*.pdf` file in a directory (non-recursive).
///
/// Files are processed one at a time, in file-name order. A failure in one
/// file is recorded in its [`FileReport`] and does not abort the batch.
///
/// # Errors
/// [`StitchError::DirectoryNotFound`] if `pdf_dir` does not exist,
/// [`StitchError::NoPdfFiles`] if it contains no PDF files.
pub async fn convert_batch(
    pdf_dir: &Path,
    output_dir: Option<&Path>,
    config: &ConvertConfig,
) -> Result<BatchOutcome, StitchError> {
    info!("Batch converting directory: {}", pdf_dir.display());

    if !pdf_dir.is_dir() {
        return Err(StitchError::DirectoryNotFound {
            path: pdf_dir.to_path_buf(),
        });
    }

    let pdf_files = list_pdf_files(pdf_dir)?;
    if pdf_files.is_empty() {
        return Err(StitchError::NoPdfFiles {
            path: pdf_dir.to_path_buf(),
        });
    }
    info!("Found {} PDF files", pdf_files.len());

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| pdf_dir.join("converted"));
    std::fs::create_dir_all(&output_dir).map_err(|e| StitchError::OutputWriteFailed {
        path: output_dir.clone(),
        source: e,
    })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(pdf_files.len());
    }

    let mut results = Vec::with_capacity(pdf_files.len());
    let mut success_count = 0;
    let mut fail_count = 0;

    for (i, pdf_file) in pdf_files.iter().enumerate() {
        let file_name = pdf_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("[{}/{}] Processing: {}", i + 1, pdf_files.len(), file_name);

        let output_file = output_dir.join(stitched_file_name(pdf_file));
        let result = convert(pdf_file.to_string_lossy(), Some(&output_file), config).await;

        match &result {
            Ok(_) => success_count += 1,
            Err(e) => {
                warn!("Failed to convert {}: {}", file_name, e);
                fail_count += 1;
            }
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(i + 1, pdf_files.len(), result.is_ok());
        }

        results.push(FileReport {
            file: file_name,
            result: ConversionReport::from(result),
        });
    }

    info!(
        "Batch complete: {} succeeded, {} failed",
        success_count, fail_count
    );

    Ok(BatchOutcome {
        success: true,
        total: results.len(),
        success_count,
        fail_count,
        results,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Default output name: `<stem>_stitched.png`.
fn stitched_file_name(pdf_path: &Path) -> String {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    format!("{stem}_stitched.png")
}

/// Where the composite goes when the caller did not say.
///
/// Local inputs get a sibling file; downloaded inputs cannot (their
/// directory is the scoped temp dir, which vanishes), so they land in the
/// current working directory.
fn resolve_output_path(
    explicit: Option<&Path>,
    resolved: &input::ResolvedInput,
) -> Result<PathBuf, StitchError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let default_name = stitched_file_name(resolved.path());
    if resolved.is_downloaded() {
        let cwd = std::env::current_dir()
            .map_err(|e| StitchError::Internal(format!("Cannot resolve working directory: {e}")))?;
        Ok(cwd.join(default_name))
    } else {
        Ok(resolved.path().with_file_name(default_name))
    }
}

/// Non-recursive listing of `*.pdf` files, sorted by name for a
/// deterministic processing order.
fn list_pdf_files(dir: &Path) -> Result<Vec<PathBuf>, StitchError> {
    let entries = std::fs::read_dir(dir).map_err(|_| StitchError::DirectoryNotFound {
        path: dir.to_path_buf(),
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stitched_name_derives_from_stem() {
        assert_eq!(
            stitched_file_name(Path::new("/docs/report.pdf")),
            "report_stitched.png"
        );
        assert_eq!(
            stitched_file_name(Path::new("slides.v2.pdf")),
            "slides.v2_stitched.png"
        );
    }

    #[test]
    fn list_pdf_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.pdf", "a.PDF", "notes.txt", "c.pdf"] {
            std::fs::write(dir.path().join(name), b"%PDF-1.4").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.pdf")).unwrap();

        let files = list_pdf_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PDF", "b.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn batch_rejects_missing_directory() {
        let err = convert_batch(
            Path::new("/no/such/dir"),
            None,
            &ConvertConfig::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StitchError::DirectoryNotFound { .. }));
    }

    #[tokio::test]
    async fn batch_rejects_directory_without_pdfs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("readme.md"), b"hello").unwrap();

        let err = convert_batch(dir.path(), None, &ConvertConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StitchError::NoPdfFiles { .. }));
    }

    #[tokio::test]
    async fn convert_rejects_missing_input_without_touching_pdfium() {
        let err = convert("/nonexistent.pdf", None, &ConvertConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StitchError::FileNotFound { .. }));
    }
}
