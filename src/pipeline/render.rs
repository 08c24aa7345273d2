//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a thread
//! designed for blocking operations so the runtime is never stalled by
//! CPU-heavy rendering.
//!
//! ## DPI to pixels
//!
//! PDF page geometry is expressed in points (1/72 inch). Rendering at
//! `dpi` therefore targets a width of `page_width_points × dpi / 72`
//! pixels per page; pdfium scales the height proportionally. Pages of the
//! same physical size come out at identical pixel widths, which is what
//! the stitcher expects for seamless stacking.

use crate::config::ConvertConfig;
use crate::error::StitchError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise all pages of a PDF, in page order, at the configured DPI.
///
/// Runs inside `spawn_blocking` since pdfium operations are CPU-bound.
pub async fn render_pdf(
    pdf_path: &Path,
    config: &ConvertConfig,
) -> Result<Vec<DynamicImage>, StitchError> {
    let path = pdf_path.to_path_buf();
    let dpi = config.dpi;
    let progress = config.progress_callback.clone();

    tokio::task::spawn_blocking(move || render_pdf_blocking(&path, dpi, progress))
        .await
        .map_err(|e| StitchError::Internal(format!("Render task panicked: {e}")))?
}

/// Blocking implementation of page rendering.
fn render_pdf_blocking(
    pdf_path: &Path,
    dpi: u32,
    progress: Option<crate::progress::ProgressCallback>,
) -> Result<Vec<DynamicImage>, StitchError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| StitchError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if let Some(ref cb) = progress {
        cb.on_render_start(total_pages);
    }

    let mut images = Vec::with_capacity(total_pages);

    for (idx, page) in pages.iter().enumerate() {
        let target_width = ((page.width().value * dpi as f32) / 72.0).round().max(1.0) as i32;
        let render_config = PdfRenderConfig::new().set_target_width(target_width);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            StitchError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {}/{} → {}x{} px",
            idx + 1,
            total_pages,
            image.width(),
            image.height()
        );

        if let Some(ref cb) = progress {
            cb.on_page_rendered(idx + 1, total_pages);
        }

        images.push(image);
    }

    Ok(images)
}

/// Bind pdfium, preferring a library shipped next to the executable over
/// the system-wide installation.
fn bind_pdfium() -> Result<Pdfium, StitchError> {
    Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| StitchError::PdfiumBindingFailed(format!("{e:?}")))
}
