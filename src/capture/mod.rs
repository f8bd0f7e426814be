//! Offscreen camera capture.
//!
//! This module provides:
//! - Request validation (camera, output path, resolution)
//! - Offscreen rendering with scoped camera/render-target restoration
//! - Optional transparent backgrounds
//! - PNG saving with sanitized, timestamped filenames
//! - Asset index refresh for captures inside the project's managed tree

pub mod dependencies;
pub mod file;
pub mod types;

mod controller;
mod pipeline;
mod session;

pub use controller::CaptureController;
pub use dependencies::{AssetIndex, CaptureDependencies, CaptureFileSaver, ManifestAssetIndex};
pub use types::{CaptureError, CaptureRequest, CaptureResult};
