//! Vertical page stitching: the core of the crate.
//!
//! ## Canvas sizing
//!
//! The canvas is `max(page widths)` wide and
//! `Σ page heights + spacing × (page_count − 1)` tall. Pages are pasted in
//! input order, top to bottom, left-aligned at x = 0; a narrower page
//! leaves background-filled canvas to its right rather than being scaled
//! or clipped. For the common case — every page rasterised from the same
//! document at the same DPI — all widths are equal and the canvas width is
//! simply the first page's width.
//!
//! ## Color-space normalisation
//!
//! The composite is plain opaque RGB. Grayscale and palette pages go
//! through a straight RGB conversion; pages carrying an alpha channel are
//! composited over the background color before pasting, so a transparent
//! region renders as the background rather than as whatever the source
//! buffer happened to contain. No alpha channel survives into the output.

use crate::error::StitchError;
use image::{imageops, DynamicImage, Rgb, RgbImage};
use tracing::{debug, info};

/// Compose an ordered, non-empty sequence of page images into one
/// vertically-stacked composite.
///
/// `spacing` is the pixel gap inserted between consecutive pages (never
/// after the last page); `background` fills the gaps and any canvas not
/// covered by a page.
///
/// # Errors
/// [`StitchError::EmptyPageSequence`] if `pages` is empty.
pub fn stitch_pages(
    pages: &[DynamicImage],
    spacing: u32,
    background: Rgb<u8>,
) -> Result<RgbImage, StitchError> {
    if pages.is_empty() {
        return Err(StitchError::EmptyPageSequence);
    }

    let width = pages.iter().map(|p| p.width()).max().unwrap_or(0);
    let total_height: u32 = pages.iter().map(|p| p.height()).sum::<u32>()
        + spacing * (pages.len() as u32 - 1);

    info!(
        "Stitching {} pages into {}x{} canvas (spacing {}px)",
        pages.len(),
        width,
        total_height,
        spacing
    );

    let mut canvas = RgbImage::from_pixel(width, total_height, background);

    let mut y_offset: i64 = 0;
    for (i, page) in pages.iter().enumerate() {
        let flattened = flatten_to_rgb(page, background);
        imageops::replace(&mut canvas, &flattened, 0, y_offset);
        y_offset += i64::from(page.height()) + i64::from(spacing);
        debug!("Pasted page {}/{}", i + 1, pages.len());
    }

    Ok(canvas)
}

/// Normalise a page to opaque RGB.
///
/// Pages with an alpha channel are alpha-composited over `background`;
/// everything else takes the plain conversion path.
fn flatten_to_rgb(page: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !page.color().has_alpha() {
        return page.to_rgb8();
    }

    let rgba = page.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = u32::from(src[3]);
        for c in 0..3 {
            let fg = u32::from(src[c]) * alpha;
            let bg = u32::from(background[c]) * (255 - alpha);
            dst[c] = ((fg + bg + 127) / 255) as u8;
        }
    }
    out
}
