//! Output value types: conversion results, batch summaries, and the static
//! capability document.
//!
//! Everything here is a plain serde value type so the CLI (and any embedding
//! application) can render results as JSON without reaching into pipeline
//! internals. The JSON field names are part of the tool's user-facing
//! contract: `success` is always present, successes carry the output
//! metadata, failures carry a human-readable `error` string.

use crate::error::StitchError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata describing one successful conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Absolute path of the written image.
    pub output_path: PathBuf,
    /// Output file size in mebibytes.
    pub file_size_mb: f64,
    /// Human-readable size, `"X.XX MB"` or `"NNN KB"`.
    pub file_size_str: String,
    /// Number of PDF pages stitched.
    pub pages: usize,
    /// Composite width in pixels.
    pub width: u32,
    /// Composite height in pixels.
    pub height: u32,
}

/// The JSON-facing result of one conversion: outcome metadata on success,
/// an error string on failure. `success` disambiguates the two shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConversionReport {
    Success {
        success: bool,
        #[serde(flatten)]
        outcome: ConversionOutcome,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl ConversionReport {
    pub fn success(outcome: ConversionOutcome) -> Self {
        ConversionReport::Success {
            success: true,
            outcome,
        }
    }

    pub fn failure(error: &StitchError) -> Self {
        ConversionReport::Failure {
            success: false,
            error: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionReport::Success { .. })
    }
}

impl From<Result<ConversionOutcome, StitchError>> for ConversionReport {
    fn from(result: Result<ConversionOutcome, StitchError>) -> Self {
        match result {
            Ok(outcome) => ConversionReport::success(outcome),
            Err(e) => ConversionReport::failure(&e),
        }
    }
}

/// One entry in a batch run: the file name and what happened to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// File name (not the full path) of the source PDF.
    pub file: String,
    pub result: ConversionReport,
}

/// Aggregated result of a batch conversion.
///
/// `success` here refers to the batch as a whole (the directory was valid
/// and every file was attempted); individual failures live in `results`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success: bool,
    pub total: usize,
    pub success_count: usize,
    pub fail_count: usize,
    pub results: Vec<FileReport>,
}

/// Static capability/metadata document, emitted by `--skill-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub language: String,
    pub framework: String,
    pub features: Vec<String>,
}

impl SkillInfo {
    /// The capability document for this build, from compile-time package
    /// metadata.
    pub fn current() -> Self {
        SkillInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            description: env!("CARGO_PKG_DESCRIPTION").to_string(),
            category: "tools".to_string(),
            tags: ["pdf", "image", "stitch", "screenshot", "converter"]
                .map(String::from)
                .to_vec(),
            language: "Rust".to_string(),
            framework: "pdfium-render, image".to_string(),
            features: [
                "PDF to image conversion",
                "Vertical page stitching",
                "Configurable DPI",
                "Configurable page spacing",
                "Batch directory conversion",
                "URL download conversion",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Render a byte count the way the results report it: `"X.XX MB"` at one
/// mebibyte and above, `"NNN KB"` below.
pub fn format_file_size(bytes: u64) -> (f64, String) {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    let human = if mb >= 1.0 {
        format!("{mb:.2} MB")
    } else {
        format!("{:.0} KB", mb * 1024.0)
    };
    (mb, human)
}
