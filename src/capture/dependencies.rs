use std::{path::PathBuf, sync::Arc};

use image::RgbaImage;

use crate::capture::{
    file::{self, FileSaveConfig},
    types::CaptureError,
};
use crate::project::{self, ProjectLayout};
use crate::reveal::{FileBrowser, SystemFileBrowser};

/// Abstraction over encoding and writing captured frames.
pub trait CaptureFileSaver: Send + Sync {
    fn save(&self, pixels: &RgbaImage, config: &FileSaveConfig) -> Result<PathBuf, CaptureError>;
}

/// Index of the project's managed asset tree, refreshed after a capture
/// lands inside it.
pub trait AssetIndex: Send + Sync {
    fn refresh(&self, project: &ProjectLayout) -> Result<(), CaptureError>;
}

/// Bundle of collaborators used by the capture controller. Each component can
/// be mocked in tests.
#[derive(Clone)]
pub struct CaptureDependencies {
    pub saver: Arc<dyn CaptureFileSaver>,
    pub asset_index: Arc<dyn AssetIndex>,
    pub browser: Arc<dyn FileBrowser>,
}

impl Default for CaptureDependencies {
    fn default() -> Self {
        Self {
            saver: Arc::new(DefaultFileSaver),
            asset_index: Arc::new(ManifestAssetIndex),
            browser: Arc::new(SystemFileBrowser::default()),
        }
    }
}

impl CaptureDependencies {
    /// Default collaborators with a specific folder-opening command.
    pub fn with_file_browser(command: Option<String>) -> Self {
        Self {
            browser: Arc::new(SystemFileBrowser::new(command)),
            ..Self::default()
        }
    }
}

struct DefaultFileSaver;

/// Rewrites `<root>/.camshot/asset-index.json`.
pub struct ManifestAssetIndex;

impl CaptureFileSaver for DefaultFileSaver {
    fn save(&self, pixels: &RgbaImage, config: &FileSaveConfig) -> Result<PathBuf, CaptureError> {
        file::save_screenshot(pixels, config)
    }
}

impl AssetIndex for ManifestAssetIndex {
    fn refresh(&self, project: &ProjectLayout) -> Result<(), CaptureError> {
        let (manifest, count) = project::refresh_asset_manifest(project)
            .map_err(|e| CaptureError::write_failure(&project.manifest_path(), e))?;
        log::info!(
            "Refreshed asset index {} ({} files)",
            manifest.display(),
            count
        );
        Ok(())
    }
}
