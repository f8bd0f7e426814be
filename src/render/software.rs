//! Software rendering backend built on Cairo image surfaces.

use std::collections::BTreeMap;

use cairo::{Context, Format, ImageSurface};
use image::{Rgba, RgbaImage};

use super::backend::{
    BackendError, CameraHandle, CameraState, PixelFormat, PixelRegion, RenderBackend,
    TargetHandle,
};
use super::draw;
use crate::scene::{ClearMode, Color, Scene, Shape, Skybox};

/// Largest target edge the backend will allocate.
pub const MAX_TARGET_DIMENSION: u32 = 16384;

/// Runtime camera: placement from the scene plus mutable render settings.
#[derive(Debug, Clone)]
struct Camera {
    name: String,
    position: [f64; 2],
    size: f64,
    state: CameraState,
}

/// [`RenderBackend`] that renders a [`Scene`] into Cairo ARGB32 surfaces.
pub struct SoftwareBackend {
    skybox: Skybox,
    shapes: Vec<Shape>,
    main_camera: Option<String>,
    cameras: Vec<Camera>,
    targets: BTreeMap<TargetHandle, ImageSurface>,
    next_target: u64,
    active: Option<TargetHandle>,
}

impl SoftwareBackend {
    /// Creates a backend hosting `scene`.
    pub fn new(scene: Scene) -> Self {
        let cameras = scene
            .cameras
            .into_iter()
            .map(|desc| Camera {
                state: CameraState {
                    target: None,
                    clear_mode: desc.clear_mode,
                    background: desc.background.to_color(),
                },
                name: desc.name,
                position: desc.position,
                size: desc.size,
            })
            .collect();

        Self {
            skybox: scene.skybox,
            shapes: scene.shapes,
            main_camera: scene.main_camera,
            cameras,
            targets: BTreeMap::new(),
            next_target: 1,
            active: None,
        }
    }

    /// Looks up a camera by name.
    pub fn find_camera(&self, name: &str) -> Option<CameraHandle> {
        self.cameras
            .iter()
            .position(|camera| camera.name == name)
            .map(|index| CameraHandle(index as u32))
    }

    /// The scene's main camera, if it names an existing camera.
    pub fn main_camera(&self) -> Option<CameraHandle> {
        self.main_camera
            .as_deref()
            .and_then(|name| self.find_camera(name))
    }

    pub fn camera_names(&self) -> impl Iterator<Item = &str> {
        self.cameras.iter().map(|camera| camera.name.as_str())
    }

    /// Number of render targets allocated and not yet released.
    pub fn live_targets(&self) -> usize {
        self.targets.len()
    }

    fn camera(&self, handle: CameraHandle) -> Option<&Camera> {
        self.cameras.get(handle.0 as usize)
    }

    fn camera_mut(&mut self, handle: CameraHandle) -> Option<&mut Camera> {
        self.cameras.get_mut(handle.0 as usize)
    }

    fn draw(&self, camera: &Camera, surface: &ImageSurface) -> Result<(), cairo::Error> {
        let width = surface.width() as f64;
        let height = surface.height() as f64;
        let ctx = Context::new(surface)?;

        match camera.state.clear_mode {
            ClearMode::Skybox => draw::render_skybox(&ctx, &self.skybox, width, height)?,
            ClearMode::SolidColor => draw::render_solid_background(&ctx, camera.state.background)?,
            ClearMode::DepthOnly | ClearMode::Nothing => {}
        }

        // Orthographic projection: camera position at the center, y up
        let scale = height / (2.0 * camera.size);
        ctx.translate(width / 2.0, height / 2.0);
        ctx.scale(scale, -scale);
        ctx.translate(-camera.position[0], -camera.position[1]);

        draw::render_shapes(&ctx, &self.shapes)?;
        drop(ctx);

        surface.flush();
        Ok(())
    }
}

impl RenderBackend for SoftwareBackend {
    fn camera_state(&self, camera: CameraHandle) -> Option<CameraState> {
        self.camera(camera).map(|camera| camera.state)
    }

    fn set_camera_target(&mut self, camera: CameraHandle, target: Option<TargetHandle>) {
        if let Some(camera) = self.camera_mut(camera) {
            camera.state.target = target;
        }
    }

    fn set_clear_mode(&mut self, camera: CameraHandle, mode: ClearMode) {
        if let Some(camera) = self.camera_mut(camera) {
            camera.state.clear_mode = mode;
        }
    }

    fn set_background(&mut self, camera: CameraHandle, color: Color) {
        if let Some(camera) = self.camera_mut(camera) {
            camera.state.background = color;
        }
    }

    fn active_target(&self) -> Option<TargetHandle> {
        self.active
    }

    fn set_active_target(&mut self, target: Option<TargetHandle>) {
        self.active = target;
    }

    fn create_target(
        &mut self,
        width: u32,
        height: u32,
        format: PixelFormat,
    ) -> Result<TargetHandle, BackendError> {
        if width == 0 || height == 0 || width > MAX_TARGET_DIMENSION || height > MAX_TARGET_DIMENSION
        {
            return Err(BackendError::Allocation(format!(
                "{}x{} is outside the supported range 1-{}",
                width, height, MAX_TARGET_DIMENSION
            )));
        }

        let cairo_format = match format {
            PixelFormat::Rgba8 => Format::ARgb32,
        };
        let surface = ImageSurface::create(cairo_format, width as i32, height as i32)
            .map_err(|e| BackendError::Allocation(e.to_string()))?;

        let handle = TargetHandle(self.next_target);
        self.next_target += 1;
        self.targets.insert(handle, surface);

        log::debug!("Allocated {} ({}x{})", handle, width, height);
        Ok(handle)
    }

    fn release_target(&mut self, target: TargetHandle) {
        match self.targets.remove(&target) {
            Some(surface) => {
                surface.finish();
                if self.active == Some(target) {
                    log::warn!("Released {} while it was the active target", target);
                    self.active = None;
                }
                log::debug!("Released {}", target);
            }
            None => log::warn!("Release requested for unknown {}", target),
        }
    }

    fn render(&mut self, camera: CameraHandle) -> Result<(), BackendError> {
        let camera = self
            .camera(camera)
            .ok_or(BackendError::UnknownCamera(camera))?;
        let target = camera
            .state
            .target
            .ok_or_else(|| BackendError::Render(format!("{} has no render target", camera.name)))?;
        let surface = self
            .targets
            .get(&target)
            .ok_or(BackendError::UnknownTarget(target))?;

        self.draw(camera, surface)
            .map_err(|e| BackendError::Render(e.to_string()))
    }

    fn read_pixels(&mut self, region: PixelRegion) -> Result<RgbaImage, BackendError> {
        let target = self
            .active
            .ok_or_else(|| BackendError::Readback("no active render target".to_string()))?;
        let surface = self
            .targets
            .get(&target)
            .ok_or(BackendError::UnknownTarget(target))?;

        let surface_width = surface.width() as u64;
        let surface_height = surface.height() as u64;
        if region.x as u64 + region.width as u64 > surface_width
            || region.y as u64 + region.height as u64 > surface_height
        {
            return Err(BackendError::Readback(format!(
                "region {:?} exceeds {}x{} target",
                region, surface_width, surface_height
            )));
        }

        let stride = surface.stride() as usize;
        let mut pixels = RgbaImage::new(region.width, region.height);
        surface
            .with_data(|data| {
                for y in 0..region.height {
                    let row = (region.y + y) as usize * stride;
                    for x in 0..region.width {
                        let offset = row + (region.x + x) as usize * 4;
                        let argb = u32::from_ne_bytes([
                            data[offset],
                            data[offset + 1],
                            data[offset + 2],
                            data[offset + 3],
                        ]);
                        pixels.put_pixel(x, y, unpremultiply(argb));
                    }
                }
            })
            .map_err(|e| BackendError::Readback(e.to_string()))?;

        Ok(pixels)
    }
}

/// Converts one premultiplied native-endian ARGB32 pixel to straight RGBA.
fn unpremultiply(argb: u32) -> Rgba<u8> {
    let a = (argb >> 24) as u8;
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |shift: u32| -> u8 {
        let premultiplied = (argb >> shift) & 0xff;
        ((premultiplied * 255 + a as u32 / 2) / a as u32).min(255) as u8
    };
    Rgba([channel(16), channel(8), channel(0), a])
}
