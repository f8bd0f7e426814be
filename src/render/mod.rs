//! Rendering backends the capture controller drives.
//!
//! - [`RenderBackend`]: the seam between capture logic and a rendering stack
//! - [`SoftwareBackend`]: Cairo implementation rendering scene files offscreen

pub mod backend;
pub mod draw;
pub mod software;

pub use backend::{
    BackendError, CameraHandle, CameraState, PixelFormat, PixelRegion, RenderBackend,
    TargetHandle,
};
pub use software::{MAX_TARGET_DIMENSION, SoftwareBackend};
