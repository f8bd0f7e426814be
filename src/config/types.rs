//! Configuration type definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Capture defaults, used whenever a command-line flag does not override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptureConfig {
    /// Output width in pixels (independent of any on-screen view)
    #[serde(default = "default_width")]
    pub width: i32,

    /// Output height in pixels
    #[serde(default = "default_height")]
    pub height: i32,

    /// Render with a transparent background and keep the PNG alpha channel
    #[serde(default = "default_transparent_background")]
    pub transparent_background: bool,

    /// Directory screenshots are written to; relative paths are resolved
    /// against the project root
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Filename prefix, e.g. "kv7_front" -> kv7_front_20260120_163500.png
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Reveal the containing folder in the system file browser after a capture
    #[serde(default)]
    pub open_folder_after_capture: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            transparent_background: default_transparent_background(),
            output_directory: default_output_directory(),
            file_prefix: default_file_prefix(),
            open_folder_after_capture: false,
        }
    }
}

/// Project layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectConfig {
    /// Project root directory (defaults to the current directory)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Managed asset tree, relative to the project root. Captures written
    /// below it are recorded in the project's asset index.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: None,
            assets_dir: default_assets_dir(),
        }
    }
}

/// Desktop integration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ShellConfig {
    /// Command used to open folders (defaults to xdg-open, open, or explorer)
    #[serde(default)]
    pub file_browser: Option<String>,
}

fn default_width() -> i32 {
    1920
}

fn default_height() -> i32 {
    1080
}

fn default_transparent_background() -> bool {
    true
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("Assets/Screenshots")
}

fn default_file_prefix() -> String {
    "screenshot".to_string()
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("Assets")
}
