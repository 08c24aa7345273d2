//! Configuration for PDF-to-image conversion.
//!
//! All conversion behaviour is controlled through [`ConvertConfig`], built
//! via its [`ConvertConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share a config across a batch run and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! The builder lets callers set only what they care about and rely on
//! documented defaults for the rest; `build()` validates the combination.

use crate::error::StitchError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Opaque white, the default gap fill.
pub const DEFAULT_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Configuration for a PDF-to-image conversion.
///
/// Built via [`ConvertConfig::builder()`] or [`ConvertConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfstitch::ConvertConfig;
///
/// let config = ConvertConfig::builder()
///     .dpi(200)
///     .spacing(15)
///     .background([240, 240, 240])
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConvertConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–400. Default: 150.
    ///
    /// 150 DPI keeps text legible in the stitched output while a long
    /// document still fits comfortably in memory. Increase to 200–300 for
    /// small-font documents; decrease to 96 when output size matters more
    /// than pixel density.
    pub dpi: u32,

    /// Pixel gap inserted between consecutive pages. Default: 10.
    ///
    /// Zero is valid and produces seamless stacking. The gap is filled
    /// with [`ConvertConfig::background`] and never appears after the
    /// last page.
    pub spacing: u32,

    /// RGB fill for inter-page gaps and uncovered canvas. Default: opaque white.
    pub background: [u8; 3],

    /// Encoder quality for lossy output formats (JPEG), 1–100. Default: 95.
    ///
    /// Ignored for PNG, which is lossless. 95 keeps rendered text crisp;
    /// lower values show ringing around glyph edges.
    pub quality: u8,

    /// Download timeout for URL inputs in seconds. Default: 30.
    pub download_timeout_secs: u64,

    /// Optional progress observer for render and batch events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            dpi: 150,
            spacing: 10,
            background: DEFAULT_BACKGROUND,
            quality: 95,
            download_timeout_secs: 30,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConvertConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertConfig")
            .field("dpi", &self.dpi)
            .field("spacing", &self.spacing)
            .field("background", &self.background)
            .field("quality", &self.quality)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl ConvertConfig {
    /// Create a new builder for `ConvertConfig`.
    pub fn builder() -> ConvertConfigBuilder {
        ConvertConfigBuilder {
            config: Self::default(),
        }
    }

    /// The background as an `image` pixel value.
    pub(crate) fn background_pixel(&self) -> image::Rgb<u8> {
        image::Rgb(self.background)
    }
}

/// Builder for [`ConvertConfig`].
#[derive(Debug)]
pub struct ConvertConfigBuilder {
    config: ConvertConfig,
}

impl ConvertConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn spacing(mut self, px: u32) -> Self {
        self.config.spacing = px;
        self
    }

    pub fn background(mut self, rgb: [u8; 3]) -> Self {
        self.config.background = rgb;
        self
    }

    pub fn quality(mut self, q: u8) -> Self {
        self.config.quality = q.clamp(1, 100);
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConvertConfig, StitchError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(StitchError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.download_timeout_secs == 0 {
            return Err(StitchError::InvalidConfig(
                "Download timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Parse a background color from a hex string such as `"ffffff"` or
/// `"#336699"`.
pub fn parse_background(s: &str) -> Result<[u8; 3], StitchError> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(StitchError::InvalidConfig(format!(
            "Background must be a 6-digit hex color (e.g. ffffff), got '{s}'"
        )));
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
    Ok([channel(0), channel(2), channel(4)])
}
