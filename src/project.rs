//! Project layout and the managed asset manifest.
//!
//! Output paths may be given relative to the project root (for example
//! `Assets/Screenshots`). Files that land under the managed asset tree are
//! recorded in `<root>/.camshot/asset-index.json` so other tools can see them
//! without rescanning the disk themselves.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::capture::file::expand_tilde;
use crate::config::ProjectConfig;

/// Directory (under the project root) holding tool-owned state.
const STATE_DIR: &str = ".camshot";
const MANIFEST_FILE: &str = "asset-index.json";

/// Root directory of a project and the location of its managed asset tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    assets_dir: PathBuf,
}

impl ProjectLayout {
    /// Creates a layout; a relative `root` is resolved against the current directory.
    pub fn new(root: impl Into<PathBuf>, assets_dir: impl Into<PathBuf>) -> Self {
        let root = expand_tilde(&root.into());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(&root))
                .unwrap_or(root)
        };

        Self {
            root: normalize(&root),
            assets_dir: assets_dir.into(),
        }
    }

    pub fn from_config(config: &ProjectConfig) -> Self {
        let root = config.root.clone().unwrap_or_else(|| PathBuf::from("."));
        Self::new(root, &config.assets_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of the managed asset tree.
    pub fn assets_root(&self) -> PathBuf {
        self.root.join(&self.assets_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(STATE_DIR).join(MANIFEST_FILE)
    }

    /// Turns a project-relative path into an absolute one.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let expanded = expand_tilde(path);
        if expanded.is_absolute() {
            normalize(&expanded)
        } else {
            normalize(&self.root.join(expanded))
        }
    }

    /// Whether `path` lies inside the managed asset tree.
    pub fn is_managed(&self, path: &Path) -> bool {
        let assets = canonical_or_normalized(&self.assets_root());
        let candidate = canonical_or_normalized(&self.resolve(path));
        candidate.starts_with(&assets) && candidate != assets
    }
}

fn canonical_or_normalized(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| normalize(path))
}

/// Lexically removes `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// One file recorded in the asset manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Path relative to the project root, `/`-separated
    pub path: String,
    pub bytes: u64,
    /// Modification time in seconds since the Unix epoch
    pub modified: u64,
}

/// Rescans the managed asset tree and rewrites the manifest.
///
/// Returns the manifest path and the number of entries written.
pub fn refresh_asset_manifest(project: &ProjectLayout) -> io::Result<(PathBuf, usize)> {
    let assets_root = project.assets_root();
    let mut entries = Vec::new();
    if assets_root.is_dir() {
        collect_assets(project.root(), &assets_root, &mut entries)?;
    }
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    let manifest_path = project.manifest_path();
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_vec_pretty(&entries)?;
    fs::write(&manifest_path, json)?;

    log::debug!(
        "Asset manifest {} now lists {} files",
        manifest_path.display(),
        entries.len()
    );
    Ok((manifest_path, entries.len()))
}

/// Reads a previously written manifest.
pub fn read_asset_manifest(project: &ProjectLayout) -> io::Result<Vec<AssetEntry>> {
    let data = fs::read(project.manifest_path())?;
    Ok(serde_json::from_slice(&data)?)
}

fn collect_assets(root: &Path, dir: &Path, entries: &mut Vec<AssetEntry>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect_assets(root, &path, entries)?;
        } else if file_type.is_file() {
            let metadata = entry.metadata()?;
            let modified = metadata
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|duration| duration.as_secs())
                .unwrap_or(0);
            let relative = path.strip_prefix(root).unwrap_or(&path);

            entries.push(AssetEntry {
                path: relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/"),
                bytes: metadata.len(),
                modified,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_resolve_against_root() {
        let project = ProjectLayout::new("/work/game", "Assets");
        assert_eq!(
            project.resolve(Path::new("Assets/Screenshots")),
            PathBuf::from("/work/game/Assets/Screenshots")
        );
        assert_eq!(
            project.resolve(Path::new("/tmp/shots")),
            PathBuf::from("/tmp/shots")
        );
        assert_eq!(
            project.resolve(Path::new("Assets/../Exports")),
            PathBuf::from("/work/game/Exports")
        );
    }

    #[test]
    fn managed_paths_are_inside_assets_tree() {
        let project = ProjectLayout::new("/work/game", "Assets");
        assert!(project.is_managed(Path::new("Assets/Screenshots/a.png")));
        assert!(project.is_managed(Path::new("/work/game/Assets/a.png")));
        assert!(!project.is_managed(Path::new("/work/game/AssetsBackup/a.png")));
        assert!(!project.is_managed(Path::new("/tmp/shots/a.png")));
        assert!(!project.is_managed(Path::new("Assets")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_keep_their_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let project = ProjectLayout::new("/work/game", "Assets");
        let raw = Path::new(OsStr::from_bytes(b"/tmp/sh\xffots"));
        assert_eq!(
            project.resolve(raw).as_os_str().as_bytes(),
            b"/tmp/sh\xffots"
        );

        let relative = Path::new(OsStr::from_bytes(b"Assets/caf\xe9"));
        let resolved = project.resolve(relative);
        assert_eq!(
            resolved.as_os_str().as_bytes(),
            b"/work/game/Assets/caf\xe9"
        );
        assert!(project.is_managed(&resolved.join("a.png")));

        let odd_root = Path::new(OsStr::from_bytes(b"/work/g\xffme"));
        let project = ProjectLayout::new(odd_root, "Assets");
        assert_eq!(project.root().as_os_str().as_bytes(), b"/work/g\xffme");
    }

    #[test]
    fn manifest_lists_files_sorted() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let shots = project.assets_root().join("Shots");
        fs::create_dir_all(&shots).unwrap();
        fs::write(shots.join("b.png"), b"bb").unwrap();
        fs::write(project.assets_root().join("a.txt"), b"a").unwrap();

        let (path, count) = refresh_asset_manifest(&project).unwrap();
        assert_eq!(path, project.manifest_path());
        assert_eq!(count, 2);

        let entries = read_asset_manifest(&project).unwrap();
        let paths: Vec<_> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["Assets/Shots/b.png", "Assets/a.txt"]);
        assert_eq!(entries[0].bytes, 2);
    }

    #[test]
    fn manifest_is_empty_without_assets_tree() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let (_, count) = refresh_asset_manifest(&project).unwrap();
        assert_eq!(count, 0);
    }
}
