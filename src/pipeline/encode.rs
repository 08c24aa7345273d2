//! Composite persistence: encode the stitched canvas and write it to disk.
//!
//! The target format is inferred from the output extension; anything the
//! build's `image` features cannot name falls back to PNG, the lossless
//! default. Writes are atomic — encode into a temp sibling, then rename —
//! so a crash mid-encode never leaves a truncated image at the final path.

use crate::error::StitchError;
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Encode `image` into `path`, returning the byte size of the written file.
///
/// `quality` applies to lossy formats (JPEG) and is ignored for PNG.
pub async fn encode_and_write(
    image: RgbImage,
    path: &Path,
    quality: u8,
) -> Result<u64, StitchError> {
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || encode_and_write_blocking(&image, &path, quality))
        .await
        .map_err(|e| StitchError::Internal(format!("Encode task panicked: {e}")))?
}

fn encode_and_write_blocking(
    image: &RgbImage,
    path: &Path,
    quality: u8,
) -> Result<u64, StitchError> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| StitchError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    // Atomic write: encode into a temp sibling, then rename into place.
    let tmp_path = temp_sibling(path);
    encode_to(image, &tmp_path, format, quality).inspect_err(|_| {
        let _ = std::fs::remove_file(&tmp_path);
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| StitchError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let size = std::fs::metadata(path)
        .map_err(|e| StitchError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();

    info!("Wrote {} bytes to {}", size, path.display());
    Ok(size)
}

fn encode_to(
    image: &RgbImage,
    tmp_path: &Path,
    format: ImageFormat,
    quality: u8,
) -> Result<(), StitchError> {
    let map_err = |detail: String| StitchError::EncodingFailed {
        path: tmp_path.to_path_buf(),
        detail,
    };

    debug!("Encoding composite as {:?}", format);
    match format {
        ImageFormat::Jpeg => {
            let file = File::create(tmp_path).map_err(|e| map_err(e.to_string()))?;
            let mut encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
            encoder
                .encode_image(image)
                .map_err(|e| map_err(e.to_string()))?;
        }
        _ => {
            image
                .save_with_format(tmp_path, format)
                .map_err(|e| map_err(e.to_string()))?;
        }
    }
    Ok(())
}

/// A temp path beside the target, unique per process so concurrent
/// invocations writing different outputs to one directory cannot collide.
fn temp_sibling(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}
