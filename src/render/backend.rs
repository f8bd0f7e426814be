//! Abstraction over the rendering stack that owns cameras and render targets.
//!
//! Camera and target handles are opaque: the backend owns the objects and the
//! capture controller only ever passes the handles back to it. This keeps the
//! controller testable against a fake backend without a graphics context.

use image::RgbaImage;
use std::fmt;
use thiserror::Error;

use crate::scene::{ClearMode, Color};

/// Opaque reference to a camera owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CameraHandle(pub u32);

/// Opaque reference to a render target owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetHandle(pub u64);

impl fmt::Display for CameraHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "camera#{}", self.0)
    }
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "target#{}", self.0)
    }
}

/// Pixel layout of an offscreen render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8 bits per channel, alpha included
    Rgba8,
}

/// Rectangle of pixels to read back from the active target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRegion {
    /// Region covering a whole `width` x `height` target.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }
}

/// Camera settings mutated by a capture and restored afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Render target the camera draws into (`None` = interactive viewport)
    pub target: Option<TargetHandle>,
    pub clear_mode: ClearMode,
    pub background: Color,
}

/// Errors reported by a rendering backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Unknown camera {0}")]
    UnknownCamera(CameraHandle),

    #[error("Unknown render target {0}")]
    UnknownTarget(TargetHandle),

    #[error("Render target allocation failed: {0}")]
    Allocation(String),

    #[error("Render failed: {0}")]
    Render(String),

    #[error("Pixel readback failed: {0}")]
    Readback(String),
}

/// Rendering stack the capture controller drives.
///
/// State setters are infallible for handles the backend reported as valid;
/// setters called with an unknown handle are ignored.
pub trait RenderBackend {
    /// Current settings of `camera`, or `None` if the handle is not valid.
    fn camera_state(&self, camera: CameraHandle) -> Option<CameraState>;

    fn set_camera_target(&mut self, camera: CameraHandle, target: Option<TargetHandle>);

    fn set_clear_mode(&mut self, camera: CameraHandle, mode: ClearMode);

    fn set_background(&mut self, camera: CameraHandle, color: Color);

    /// Process-wide target that readback operates on.
    fn active_target(&self) -> Option<TargetHandle>;

    fn set_active_target(&mut self, target: Option<TargetHandle>);

    /// Allocates an offscreen target of exactly `width` x `height` pixels.
    fn create_target(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<TargetHandle, BackendError>;

    /// Destroys a target immediately.
    fn release_target(&mut self, target: TargetHandle);

    /// Renders the scene once through `camera` into the target bound to it.
    fn render(&mut self, camera: CameraHandle) -> Result<(), BackendError>;

    /// Copies `region` of the active target into CPU memory.
    fn read_pixels(&mut self, region: PixelRegion) -> Result<RgbaImage, BackendError>;
}
