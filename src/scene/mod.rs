//! Scene description files.
//!
//! A scene is a TOML document listing cameras, a skybox gradient, and the
//! shapes drawn by every camera:
//!
//! ```toml
//! main_camera = "front"
//!
//! [skybox]
//! zenith = [70, 120, 200]
//! horizon = [210, 225, 240]
//!
//! [[cameras]]
//! name = "front"
//! size = 3.0
//!
//! [[shapes]]
//! kind = "ellipse"
//! cx = 0.0
//! cy = 0.0
//! rx = 1.0
//! ry = 1.0
//! color = "orange"
//! fill = true
//! ```

pub mod camera;
pub mod color;
pub mod shape;

pub use camera::{CameraDesc, ClearMode};
pub use color::{Color, ColorSpec};
pub use shape::Shape;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Smallest orthographic size a camera may use.
const MIN_CAMERA_SIZE: f64 = 0.01;

/// Vertical gradient painted by cameras using [`ClearMode::Skybox`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skybox {
    /// Color at the top edge of the view
    #[serde(default = "default_zenith")]
    pub zenith: ColorSpec,
    /// Color at the bottom edge of the view
    #[serde(default = "default_horizon")]
    pub horizon: ColorSpec,
}

impl Default for Skybox {
    fn default() -> Self {
        Self {
            zenith: default_zenith(),
            horizon: default_horizon(),
        }
    }
}

fn default_zenith() -> ColorSpec {
    ColorSpec::Rgb([70, 120, 200])
}

fn default_horizon() -> ColorSpec {
    ColorSpec::Rgb([210, 225, 240])
}

/// Complete scene: cameras plus the shapes they see.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// Camera used when none is named explicitly
    #[serde(default)]
    pub main_camera: Option<String>,

    #[serde(default)]
    pub skybox: Skybox,

    #[serde(default)]
    pub cameras: Vec<CameraDesc>,

    #[serde(default)]
    pub shapes: Vec<Shape>,
}

impl Scene {
    /// Loads and validates a scene file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// declares the same camera name twice.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene from {}", path.display()))?;

        let scene = Self::from_toml_str(&source)
            .with_context(|| format!("Failed to load scene from {}", path.display()))?;

        info!(
            "Loaded scene from {} ({} cameras, {} shapes)",
            path.display(),
            scene.cameras.len(),
            scene.shapes.len()
        );
        Ok(scene)
    }

    /// Parses and validates a scene from TOML text.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let mut scene: Scene = toml::from_str(source).context("Invalid scene TOML")?;
        scene.validate_and_clamp()?;
        debug!("Scene: {:?}", scene);
        Ok(scene)
    }

    fn validate_and_clamp(&mut self) -> Result<()> {
        let mut seen = HashSet::new();
        for camera in &mut self.cameras {
            if !seen.insert(camera.name.clone()) {
                bail!("Duplicate camera name '{}'", camera.name);
            }

            if camera.size.is_nan() || camera.size < MIN_CAMERA_SIZE {
                log::warn!(
                    "Invalid size {} for camera '{}', clamping to {}",
                    camera.size,
                    camera.name,
                    MIN_CAMERA_SIZE
                );
                camera.size = MIN_CAMERA_SIZE;
            }
        }

        if let Some(main) = &self.main_camera
            && !seen.contains(main)
        {
            log::warn!("main_camera '{}' does not name a camera in the scene", main);
        }

        Ok(())
    }
}
