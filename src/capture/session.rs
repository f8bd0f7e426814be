//! Scoped camera and render-target state for one offscreen capture.

use image::RgbaImage;

use super::types::CaptureError;
use crate::render::{
    BackendError, CameraHandle, CameraState, PixelFormat, PixelRegion, RenderBackend,
    TargetHandle,
};
use crate::scene::ClearMode;

/// Offscreen target allocated for the duration of one capture.
#[derive(Debug, Clone, Copy)]
struct OffscreenBuffer {
    target: TargetHandle,
    width: u32,
    height: u32,
}

/// Guard over everything a capture mutates.
///
/// Creating the session snapshots the camera's target binding, clear mode and
/// background together with the backend's active target. When the session
/// ends, by [`OffscreenSession::finish`] or by being dropped on an error path,
/// the camera target and active target are restored first, the offscreen
/// buffer is released, and the transparent-background override is undone.
/// The active target therefore never points at a released buffer.
pub(crate) struct OffscreenSession<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    camera: CameraHandle,
    saved: CameraState,
    saved_active: Option<TargetHandle>,
    background_overridden: bool,
    buffer: Option<OffscreenBuffer>,
    restored: bool,
}

impl<'a, B: RenderBackend + ?Sized> OffscreenSession<'a, B> {
    pub(crate) fn begin(backend: &'a mut B, camera: CameraHandle) -> Result<Self, CaptureError> {
        let saved = backend
            .camera_state(camera)
            .ok_or(CaptureError::NoCameraSelected)?;
        let saved_active = backend.active_target();

        log::debug!(
            "Saved {} state {:?} (active target {:?})",
            camera,
            saved,
            saved_active
        );

        Ok(Self {
            backend,
            camera,
            saved,
            saved_active,
            background_overridden: false,
            buffer: None,
            restored: false,
        })
    }

    /// Switches the camera to a solid clear color with zero alpha.
    pub(crate) fn clear_to_transparent(&mut self) {
        self.backend
            .set_clear_mode(self.camera, ClearMode::SolidColor);
        self.backend
            .set_background(self.camera, self.saved.background.with_alpha(0.0));
        self.background_overridden = true;
    }

    pub(crate) fn allocate(&mut self, width: u32, height: u32) -> Result<(), CaptureError> {
        let target = self
            .backend
            .create_target(width, height, PixelFormat::Rgba8)
            .map_err(CaptureError::AllocationFailure)?;

        self.buffer = Some(OffscreenBuffer {
            target,
            width,
            height,
        });
        Ok(())
    }

    /// Binds the camera to the offscreen buffer and renders once.
    pub(crate) fn render(&mut self) -> Result<(), CaptureError> {
        let buffer = self.buffer()?;
        self.backend.set_camera_target(self.camera, Some(buffer.target));
        self.backend
            .render(self.camera)
            .map_err(CaptureError::RenderFailure)
    }

    /// Makes the buffer the active target and copies its pixels to the CPU.
    pub(crate) fn read_back(&mut self) -> Result<RgbaImage, CaptureError> {
        let buffer = self.buffer()?;
        self.backend.set_active_target(Some(buffer.target));

        let pixels = self
            .backend
            .read_pixels(PixelRegion::full(buffer.width, buffer.height))
            .map_err(CaptureError::RenderFailure)?;

        if pixels.dimensions() != (buffer.width, buffer.height) {
            return Err(CaptureError::RenderFailure(BackendError::Readback(format!(
                "expected {}x{} pixels, got {}x{}",
                buffer.width,
                buffer.height,
                pixels.width(),
                pixels.height()
            ))));
        }

        Ok(pixels)
    }

    /// Ends the session, restoring all saved state.
    pub(crate) fn finish(mut self) {
        self.restore();
    }

    fn buffer(&self) -> Result<OffscreenBuffer, CaptureError> {
        self.buffer.ok_or_else(|| {
            CaptureError::RenderFailure(BackendError::Render(
                "no offscreen buffer allocated".to_string(),
            ))
        })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        self.backend.set_camera_target(self.camera, self.saved.target);
        self.backend.set_active_target(self.saved_active);

        if let Some(buffer) = self.buffer.take() {
            self.backend.release_target(buffer.target);
        }

        if self.background_overridden {
            self.backend
                .set_clear_mode(self.camera, self.saved.clear_mode);
            self.backend
                .set_background(self.camera, self.saved.background);
        }

        log::debug!("Restored {} state", self.camera);
    }
}

impl<B: RenderBackend + ?Sized> Drop for OffscreenSession<'_, B> {
    fn drop(&mut self) {
        self.restore();
    }
}
