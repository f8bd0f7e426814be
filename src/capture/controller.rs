use std::path::{Path, PathBuf};

use crate::capture::{
    dependencies::CaptureDependencies,
    pipeline::perform_capture,
    types::{CaptureError, CaptureRequest, CaptureResult},
};
use crate::project::ProjectLayout;
use crate::render::RenderBackend;
use crate::reveal;

/// Captures camera frames to PNG files through a [`RenderBackend`].
///
/// The controller owns the backend for its lifetime. Captures run
/// synchronously on the calling thread and never overlap.
pub struct CaptureController<B: RenderBackend> {
    backend: B,
    project: ProjectLayout,
    dependencies: CaptureDependencies,
}

impl<B: RenderBackend> CaptureController<B> {
    /// Create a controller with the default saver, asset index and file browser.
    pub fn new(backend: B, project: ProjectLayout) -> Self {
        Self::with_dependencies(backend, project, CaptureDependencies::default())
    }

    /// Create a controller with custom dependencies (useful for testing).
    pub fn with_dependencies(
        backend: B,
        project: ProjectLayout,
        dependencies: CaptureDependencies,
    ) -> Self {
        Self {
            backend,
            project,
            dependencies,
        }
    }

    /// Renders the requested camera offscreen and writes the frame as a PNG.
    ///
    /// Camera settings and the backend's active target are left exactly as
    /// they were, whether the capture succeeds or fails.
    pub fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureResult, CaptureError> {
        match perform_capture(
            &mut self.backend,
            request,
            &self.project,
            &self.dependencies,
        ) {
            Ok(result) => {
                log::info!("Screenshot saved to: {}", result.saved_path.display());
                Ok(result)
            }
            Err(err) => {
                log::warn!("Capture failed: {}", err);
                Err(err)
            }
        }
    }

    /// Opens the folder containing a saved capture.
    pub fn reveal_capture(&self, result: &CaptureResult) {
        match result.saved_path.parent() {
            Some(folder) => self.reveal(folder),
            None => log::warn!(
                "Cannot open folder for {}: no parent directory",
                result.saved_path.display()
            ),
        }
    }

    /// Opens `folder` in the file browser; failures are logged only.
    pub fn reveal(&self, folder: &Path) {
        reveal::reveal(folder, &self.project, self.dependencies.browser.as_ref());
    }

    /// Opens `folder` in the file browser, returning the resolved path.
    pub fn try_reveal(&self, folder: &Path) -> Result<PathBuf, CaptureError> {
        reveal::try_reveal(folder, &self.project, self.dependencies.browser.as_ref())
    }

    pub fn project(&self) -> &ProjectLayout {
        &self.project
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
