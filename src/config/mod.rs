//! Configuration file support for camshot.
//!
//! Settings are read from `~/.config/camshot/config.toml` (or the file passed
//! with `--config`). They provide the defaults for every capture: output
//! resolution, background transparency, output folder, filename prefix, and
//! the project layout.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod types;

pub use types::{CaptureConfig, ProjectConfig, ShellConfig};

use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::MAX_TARGET_DIMENSION;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [capture]
/// width = 1920
/// height = 1080
/// transparent_background = true
/// output_directory = "Assets/Screenshots"
/// file_prefix = "screenshot"
/// open_folder_after_capture = false
///
/// [project]
/// assets_dir = "Assets"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Capture defaults
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Project root and managed asset tree
    #[serde(default)]
    pub project: ProjectConfig,

    /// Desktop integration
    #[serde(default)]
    pub shell: ShellConfig,
}

impl Config {
    /// Clamps oversized resolutions.
    ///
    /// Non-positive sizes are kept as written so the capture itself rejects
    /// them with a clear error instead of silently producing a different image.
    fn validate_and_clamp(&mut self) {
        let max = MAX_TARGET_DIMENSION as i32;

        if self.capture.width > max {
            log::warn!(
                "Invalid capture width {}, clamping to {}",
                self.capture.width,
                max
            );
            self.capture.width = max;
        }

        if self.capture.height > max {
            log::warn!(
                "Invalid capture height {}, clamping to {}",
                self.capture.height,
                max
            );
            self.capture.height = max;
        }

        if self.capture.width <= 0 || self.capture.height <= 0 {
            log::warn!(
                "Configured resolution {}x{} is not positive; captures will fail until it is fixed",
                self.capture.width,
                self.capture.height
            );
        }

        if self.capture.file_prefix.trim().is_empty() {
            debug!("Empty file_prefix configured, captures will use the default prefix");
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("camshot");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from `config_path`, or returns defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or contains invalid TOML.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the config to TOML and writes it to `config_path`.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, config_str)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Writes the documented example config to `config_path`.
    ///
    /// # Errors
    /// Returns an error if a config file already exists at the target path or
    /// the file cannot be written.
    pub fn create_default_file(config_path: &Path) -> Result<()> {
        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let default_config = include_str!("../../config.example.toml");
        fs::write(config_path, default_config)?;

        info!("Created default config at {}", config_path.display());
        Ok(())
    }

    /// JSON schema describing the config file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}
