//! Pipeline stages for PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different rendering backend) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ stitch ──▶ encode
//! (URL/path) (pdfium)  (compose)  (PNG/JPEG on disk)
//! ```
//!
//! 1. [`input`]  — canonicalise the user-supplied path or URL to a local file
//! 2. [`render`] — rasterise every page at the configured DPI; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 3. [`crate::stitch`] — compose the pages into one canvas (pure, sync)
//! 4. [`encode`] — encode the composite and write it atomically

pub mod encode;
pub mod input;
pub mod render;
