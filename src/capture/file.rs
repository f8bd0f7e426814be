//! File saving functionality for captured frames.

use super::types::CaptureError;
use chrono::{DateTime, Local};
use image::buffer::ConvertBuffer;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix used when the configured one is empty or whitespace.
pub const DEFAULT_PREFIX: &str = "screenshot";

/// Second-resolution local timestamp appended to every filename.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Configuration for file saving.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSaveConfig {
    /// Directory to save screenshots to (created if missing).
    pub save_directory: PathBuf,
    /// Unsanitized filename prefix.
    pub file_prefix: String,
    /// Encode RGBA instead of RGB.
    pub keep_alpha: bool,
}

/// Characters rejected in filenames on at least one supported OS, so saved
/// projects stay portable between systems.
pub fn is_illegal_filename_char(c: char) -> bool {
    c.is_control() || matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}

/// Replaces illegal filename characters with `_`.
///
/// Leading/trailing whitespace is trimmed first; an empty result becomes
/// [`DEFAULT_PREFIX`].
pub fn sanitize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim();
    if trimmed.is_empty() {
        return DEFAULT_PREFIX.to_string();
    }

    trimmed
        .chars()
        .map(|c| if is_illegal_filename_char(c) { '_' } else { c })
        .collect()
}

/// Generates `<sanitized-prefix>_<YYYYMMDD_HHMMSS>.png` for the given time.
pub fn generate_filename(prefix: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}.png",
        sanitize_prefix(prefix),
        now.format(TIMESTAMP_FORMAT)
    )
}

/// Ensure the save directory exists, creating it (and parents) if necessary.
///
/// # Returns
/// The canonicalized path to the directory
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, CaptureError> {
    if !directory.is_dir() {
        log::info!("Creating screenshot directory: {}", directory.display());
        fs::create_dir_all(directory).map_err(|e| CaptureError::write_failure(directory, e))?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Encodes pixels as PNG, RGBA8 when `keep_alpha` is set and RGB8 otherwise.
pub fn encode_png(pixels: &RgbaImage, keep_alpha: bool) -> Result<Vec<u8>, image::ImageError> {
    let (width, height) = pixels.dimensions();
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new(&mut buffer);

    if keep_alpha {
        encoder.write_image(pixels.as_raw(), width, height, ExtendedColorType::Rgba8)?;
    } else {
        let rgb: RgbImage = pixels.convert();
        encoder.write_image(rgb.as_raw(), width, height, ExtendedColorType::Rgb8)?;
    }

    Ok(buffer)
}

/// Encode `pixels` and write them into the configured directory.
///
/// The PNG is fully encoded in memory before anything touches the disk. A
/// file captured in the same second as an existing one replaces it.
///
/// # Returns
/// Absolute path to the saved file
pub fn save_screenshot(
    pixels: &RgbaImage,
    config: &FileSaveConfig,
) -> Result<PathBuf, CaptureError> {
    let directory = ensure_directory_exists(&config.save_directory)?;

    let filename = generate_filename(&config.file_prefix, Local::now());
    let file_path = directory.join(&filename);

    let png = encode_png(pixels, config.keep_alpha)
        .map_err(|e| CaptureError::write_failure(&file_path, e))?;

    if file_path.exists() {
        log::warn!(
            "Overwriting {} (captured within the same second)",
            file_path.display()
        );
    }

    log::info!(
        "Saving screenshot to: {} ({} bytes)",
        file_path.display(),
        png.len()
    );

    if let Err(err) = fs::write(&file_path, &png) {
        // Do not leave a truncated PNG behind
        let _ = fs::remove_file(&file_path);
        return Err(CaptureError::write_failure(&file_path, err));
    }

    log::debug!("File written: {} bytes", png.len());
    Ok(file_path)
}

/// Expand a leading `~` component to the home directory.
///
/// Works on the raw path so non-UTF-8 components pass through unchanged.
pub fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}
