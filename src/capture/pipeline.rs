use image::RgbaImage;

use crate::capture::{
    dependencies::CaptureDependencies,
    file::FileSaveConfig,
    session::OffscreenSession,
    types::{CaptureError, CaptureRequest, CaptureResult},
};
use crate::project::ProjectLayout;
use crate::render::{CameraHandle, RenderBackend};

/// Request fields that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValidatedRequest {
    pub(crate) camera: CameraHandle,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) transparent_background: bool,
}

/// Checks the request in order: camera, output path, resolution.
///
/// Nothing is mutated or allocated before all checks pass.
pub(crate) fn validate<B: RenderBackend + ?Sized>(
    backend: &B,
    request: &CaptureRequest,
) -> Result<ValidatedRequest, CaptureError> {
    let camera = request
        .camera
        .filter(|camera| backend.camera_state(*camera).is_some())
        .ok_or(CaptureError::NoCameraSelected)?;

    if request.output_directory.to_string_lossy().trim().is_empty() {
        return Err(CaptureError::EmptyOutputPath);
    }

    if request.width <= 0 || request.height <= 0 {
        return Err(CaptureError::InvalidResolution {
            width: request.width,
            height: request.height,
        });
    }

    Ok(ValidatedRequest {
        camera,
        width: request.width as u32,
        height: request.height as u32,
        transparent_background: request.transparent_background,
    })
}

/// Renders one frame offscreen and returns its pixels.
///
/// All camera and render-target state is restored before this returns, on
/// success and on every error path.
pub(crate) fn render_offscreen<B: RenderBackend + ?Sized>(
    backend: &mut B,
    request: &ValidatedRequest,
) -> Result<RgbaImage, CaptureError> {
    let mut session = OffscreenSession::begin(backend, request.camera)?;

    if request.transparent_background {
        session.clear_to_transparent();
    }

    session.allocate(request.width, request.height)?;
    session.render()?;
    let pixels = session.read_back()?;
    session.finish();

    Ok(pixels)
}

pub(crate) fn perform_capture<B: RenderBackend + ?Sized>(
    backend: &mut B,
    request: &CaptureRequest,
    project: &ProjectLayout,
    dependencies: &CaptureDependencies,
) -> Result<CaptureResult, CaptureError> {
    let validated = validate(backend, request)?;

    log::info!(
        "Starting capture: {} at {}x{} (transparent background: {})",
        validated.camera,
        validated.width,
        validated.height,
        validated.transparent_background
    );

    let pixels = render_offscreen(backend, &validated)?;
    log::debug!("Read back {} bytes of pixel data", pixels.len());

    let save_config = FileSaveConfig {
        save_directory: project.resolve(&request.output_directory),
        file_prefix: request.file_prefix.clone(),
        keep_alpha: validated.transparent_background,
    };
    let saved_path = dependencies.saver.save(&pixels, &save_config)?;
    drop(pixels);

    if project.is_managed(&saved_path) {
        if let Err(err) = dependencies.asset_index.refresh(project) {
            log::warn!("Screenshot saved but asset index refresh failed: {}", err);
        }
    } else {
        log::debug!(
            "{} is outside the managed asset tree, skipping index refresh",
            saved_path.display()
        );
    }

    Ok(CaptureResult {
        saved_path,
        width: validated.width,
        height: validated.height,
        has_alpha: validated.transparent_background,
    })
}
