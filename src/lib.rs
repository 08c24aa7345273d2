//! # pdfstitch
//!
//! Convert a PDF document into a single vertically-stitched image — the
//! long-screenshot look of a scrolled-through slide deck.
//!
//! ## Why this crate?
//!
//! Sharing a PDF as an image usually means exporting every page separately
//! and letting the viewer piece them together. This crate rasterises each
//! page and stacks them into one tall canvas with a configurable gap and
//! background, so a whole document previews as a single scrollable image
//! in chat apps, issue trackers, and image viewers.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   resolve local file or download from URL
//!  ├─ 2. Render  rasterise pages via pdfium (CPU-bound, spawn_blocking)
//!  ├─ 3. Stitch  compose pages vertically onto one RGB canvas
//!  └─ 4. Encode  write PNG/JPEG atomically + size/page/dimension report
//! ```
//!
//! Every stage runs in sequence; batch mode processes files one at a time.
//! One document's pages are held in memory only for the duration of its
//! own conversion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfstitch::{convert, ConvertConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConvertConfig::default();
//!     let outcome = convert("document.pdf", None, &config).await?;
//!     println!(
//!         "{} pages → {}x{} px at {}",
//!         outcome.pages,
//!         outcome.width,
//!         outcome.height,
//!         outcome.output_path.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfstitch` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdfstitch = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stitch;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{parse_background, ConvertConfig, ConvertConfigBuilder, DEFAULT_BACKGROUND};
pub use convert::{convert, convert_batch, convert_sync};
pub use error::StitchError;
pub use output::{
    format_file_size, BatchOutcome, ConversionOutcome, ConversionReport, FileReport, SkillInfo,
};
pub use progress::{ConvertProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stitch::stitch_pages;
