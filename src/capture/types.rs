//! Data types for offscreen camera capture.

use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::CaptureConfig;
use crate::render::{BackendError, CameraHandle};

/// Everything needed to capture one frame from a camera.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureRequest {
    /// Camera to render through (`None` = nothing selected).
    pub camera: Option<CameraHandle>,
    /// Output width in pixels; must be positive.
    pub width: i32,
    /// Output height in pixels; must be positive.
    pub height: i32,
    /// Clear to a zero-alpha solid color and keep the alpha channel.
    pub transparent_background: bool,
    /// Absolute or project-relative output directory.
    pub output_directory: PathBuf,
    /// Filename prefix, sanitized before use.
    pub file_prefix: String,
}

impl CaptureRequest {
    /// Builds a request for `camera` from the configured capture defaults.
    pub fn from_config(camera: Option<CameraHandle>, config: &CaptureConfig) -> Self {
        Self {
            camera,
            width: config.width,
            height: config.height,
            transparent_background: config.transparent_background,
            output_directory: config.output_directory.clone(),
            file_prefix: config.file_prefix.clone(),
        }
    }
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    /// Absolute path of the PNG that was written.
    pub saved_path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Whether the PNG carries an alpha channel.
    pub has_alpha: bool,
}

/// Errors that can occur during capture or folder reveal.
///
/// Every variant is a user-correctable condition; none of them leaves camera
/// or render-target state modified.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("No camera selected")]
    NoCameraSelected,

    #[error("Output path is empty")]
    EmptyOutputPath,

    #[error("Width and height must be greater than 0 (got {width}x{height})")]
    InvalidResolution { width: i32, height: i32 },

    #[error("Failed to allocate offscreen buffer: {0}")]
    AllocationFailure(#[source] BackendError),

    #[error("Failed to render camera: {0}")]
    RenderFailure(#[source] BackendError),

    #[error("Failed to save screenshot to {}: {source}", .path.display())]
    EncodeOrWriteFailure {
        path: PathBuf,
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("Folder not found: {}", .0.display())]
    FolderNotFound(PathBuf),

    #[error("Failed to launch '{command}' to open {}: {source}", .path.display())]
    RevealFailure {
        command: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CaptureError {
    pub(crate) fn write_failure(
        path: &Path,
        source: impl Into<Box<dyn StdError + Send + Sync>>,
    ) -> Self {
        CaptureError::EncodeOrWriteFailure {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
