//! Scene cameras and their background clear policy.

use super::color::{CAMERA_BLUE, ColorSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Policy governing what a camera writes into pixels no shape covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ClearMode {
    /// Paint the scene skybox gradient (always opaque)
    #[default]
    Skybox,
    /// Paint the camera background color, alpha included
    SolidColor,
    /// Keep the previous color contents
    DepthOnly,
    /// Do not clear at all
    Nothing,
}

/// Camera as described in a scene file.
///
/// # Example TOML
/// ```toml
/// [[cameras]]
/// name = "front"
/// position = [0.0, 1.5]
/// size = 4.0
/// clear_mode = "solid-color"
/// background = [49, 77, 121]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDesc {
    /// Unique camera name used to select it for capture
    pub name: String,

    /// World point at the center of the view
    #[serde(default)]
    pub position: [f64; 2],

    /// Half of the visible world height (orthographic size)
    #[serde(default = "default_size")]
    pub size: f64,

    #[serde(default)]
    pub clear_mode: ClearMode,

    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

fn default_size() -> f64 {
    5.0
}

fn default_background() -> ColorSpec {
    CAMERA_BLUE.into()
}

impl CameraDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0, 0.0],
            size: default_size(),
            clear_mode: ClearMode::default(),
            background: default_background(),
        }
    }
}
