//! CLI binary for pdfstitch.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConvertConfig`, dispatches to the right orchestrator, and prints one
//! JSON result object per invocation. Progress goes to stderr; JSON goes
//! to stdout. Handled conversion failures still exit 0 — the JSON carries
//! `success: false` — so scripted callers parse one shape everywhere.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdfstitch::{
    convert, convert_batch, parse_background, ConversionReport, ConvertConfig,
    ConvertProgressCallback, ProgressCallback, SkillInfo,
};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── CLI progress callback using indicatif ────────────────────────────────

/// Terminal progress: one bar that tracks page rendering for a single
/// conversion, or files for a batch run.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:40.green/238}] {pos:>3}/{len}  ⏱ {elapsed_precise}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  "),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConvertProgressCallback for CliProgressCallback {
    fn on_render_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_position(0);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_rendered(&self, _page_num: usize, _total: usize) {
        self.bar.inc(1);
    }

    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.set_position(0);
        self.bar.set_prefix("Converting");
    }

    fn on_file_complete(&self, file_num: usize, total: usize, success: bool) {
        self.bar.println(format!(
            "  {} file {:>3}/{:<3}",
            if success { "✓" } else { "✗" },
            file_num,
            total,
        ));
        self.bar.set_position(file_num as u64);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes document_stitched.png beside the input)
  pdfstitch document.pdf

  # Custom output, resolution, and page gap
  pdfstitch document.pdf -o long.png -d 200 -s 15

  # Download and convert a remote PDF
  pdfstitch -u https://example.com/document.pdf

  # Convert every PDF in a directory
  pdfstitch -b --pdf-dir ./pdfs --output-dir ./out

  # Capability metadata as JSON
  pdfstitch --skill-info

OUTPUT:
  Each run prints one JSON object to stdout: {"success": true, ...} with
  output_path / file_size_mb / file_size_str / pages / width / height, or
  {"success": false, "error": "..."} when the conversion failed. Handled
  failures still exit 0; only invalid arguments exit non-zero.

SETUP:
  pdfstitch renders pages through the pdfium library. Place libpdfium next
  to the executable or install it system-wide. Pre-built binaries:
  https://github.com/bblanchon/pdfium-binaries
"#;

/// Stitch PDF pages into one long screenshot-style image.
#[derive(Parser, Debug)]
#[command(
    name = "pdfstitch",
    version,
    about = "Stitch PDF pages into one long screenshot-style image",
    long_about = "Convert a PDF document (local file or URL) into a single vertically-stitched \
image, emulating a slideshow-style long screenshot. Supports per-file and batch conversion; \
results are reported as JSON.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    disable_help_flag = false
)]
struct Cli {
    /// Local PDF file path.
    pdf_file: Option<PathBuf>,

    /// Write the image to this path instead of `<input_stem>_stitched.png`.
    #[arg(short, long, env = "PDFSTITCH_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI (72–400).
    #[arg(short, long, env = "PDFSTITCH_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Pixel gap between pages.
    #[arg(short, long, env = "PDFSTITCH_SPACING", default_value_t = 10)]
    spacing: u32,

    /// Background color as 6-digit hex (fills gaps and page margins).
    #[arg(long, env = "PDFSTITCH_BACKGROUND", default_value = "ffffff")]
    background: String,

    /// JPEG quality 1–100 (ignored for PNG output).
    #[arg(long, env = "PDFSTITCH_QUALITY", default_value_t = 95,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Download and convert a remote PDF instead of a local file.
    #[arg(short, long, conflicts_with = "pdf_file")]
    url: Option<String>,

    /// Batch mode: convert every *.pdf in --pdf-dir.
    #[arg(short, long, requires = "pdf_dir", conflicts_with_all = ["pdf_file", "url"])]
    batch: bool,

    /// PDF source directory (batch mode).
    #[arg(long, env = "PDFSTITCH_PDF_DIR")]
    pdf_dir: Option<PathBuf>,

    /// Image output directory (batch mode, default: `<pdf-dir>/converted`).
    #[arg(long, env = "PDFSTITCH_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFSTITCH_DOWNLOAD_TIMEOUT", default_value_t = 30)]
    download_timeout: u64,

    /// Print the static capability/metadata document as JSON.
    #[arg(long)]
    skill_info: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFSTITCH_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFSTITCH_VERBOSE")]
    verbose: bool,

    /// Suppress all output except the JSON result.
    #[arg(short, long, env = "PDFSTITCH_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Logs go to stderr so stdout stays clean JSON. The progress bar
    // provides the interactive feedback, so INFO logs stay off unless
    // explicitly requested.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Skill info ───────────────────────────────────────────────────────
    if cli.skill_info {
        print_json(&SkillInfo::current())?;
        return Ok(());
    }

    // ── No mode selected: print usage, exit cleanly ──────────────────────
    if cli.pdf_file.is_none() && cli.url.is_none() && !cli.batch {
        Cli::command()
            .print_long_help()
            .context("Failed to print help")?;
        return Ok(());
    }

    let config = build_config(&cli)?;

    // ── Dispatch ─────────────────────────────────────────────────────────
    if cli.batch {
        let pdf_dir = cli
            .pdf_dir
            .as_deref()
            .context("--batch requires --pdf-dir")?;
        match convert_batch(pdf_dir, cli.output_dir.as_deref(), &config).await {
            Ok(outcome) => print_json(&outcome)?,
            Err(e) => print_json(&ConversionReport::failure(&e))?,
        }
        return Ok(());
    }

    let input = match (&cli.url, &cli.pdf_file) {
        (Some(url), _) => url.clone(),
        (None, Some(path)) => path.to_string_lossy().into_owned(),
        (None, None) => unreachable!("dispatch guard checked above"),
    };

    let report = ConversionReport::from(convert(&input, cli.output.as_deref(), &config).await);
    print_json(&report)?;

    Ok(())
}

/// Map CLI args to `ConvertConfig`.
fn build_config(cli: &Cli) -> Result<ConvertConfig> {
    let background = parse_background(&cli.background).context("Invalid --background")?;

    let mut builder = ConvertConfig::builder()
        .dpi(cli.dpi)
        .spacing(cli.spacing)
        .background(background)
        .quality(cli.quality)
        .download_timeout_secs(cli.download_timeout);

    if !cli.quiet && !cli.no_progress {
        let cb = CliProgressCallback::new();
        builder = builder.progress_callback(cb as ProgressCallback);
    }

    builder.build().context("Invalid configuration")
}

/// Pretty-print a value as 2-space-indented UTF-8 JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise result")?;
    println!("{json}");
    Ok(())
}
