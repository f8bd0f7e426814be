//! Opening output folders in the system file browser.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::capture::CaptureError;
use crate::project::ProjectLayout;

/// Abstraction over the OS shell's "show this folder" action.
pub trait FileBrowser: Send + Sync {
    /// Program used to open folders, for diagnostics.
    fn command(&self) -> &str;

    fn open(&self, folder: &Path) -> io::Result<()>;
}

/// Opens folders by spawning the platform's opener (or a configured command).
#[derive(Debug, Clone)]
pub struct SystemFileBrowser {
    command: String,
}

impl SystemFileBrowser {
    pub fn new(command: Option<String>) -> Self {
        let command = command
            .filter(|cmd| !cmd.trim().is_empty())
            .unwrap_or_else(|| platform_opener().to_string());
        Self { command }
    }
}

impl Default for SystemFileBrowser {
    fn default() -> Self {
        Self::new(None)
    }
}

fn platform_opener() -> &'static str {
    if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    }
}

impl SystemFileBrowser {
    /// Windows Explorer exits with 1 even when the window opened.
    fn ignores_exit_status(&self) -> bool {
        Path::new(&self.command)
            .file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("explorer"))
    }
}

impl FileBrowser for SystemFileBrowser {
    fn command(&self) -> &str {
        &self.command
    }

    fn open(&self, folder: &Path) -> io::Result<()> {
        // Null stdio so only the opener itself is waited on, not what it launches
        let mut child = Command::new(&self.command)
            .arg(folder)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        log::debug!("Spawned {} (pid: {})", self.command, child.id());
        let status = child.wait()?;

        if !status.success() && !self.ignores_exit_status() {
            return Err(io::Error::other(format!("exited with {}", status)));
        }

        log::info!("Opened {} with {}", folder.display(), self.command);
        Ok(())
    }
}

/// Resolves `path` against the project root and checks that it is a directory.
pub fn resolve_folder(path: &Path, project: &ProjectLayout) -> Result<PathBuf, CaptureError> {
    if path.to_string_lossy().trim().is_empty() {
        return Err(CaptureError::EmptyOutputPath);
    }

    let resolved = project.resolve(path);
    if !resolved.is_dir() {
        return Err(CaptureError::FolderNotFound(resolved));
    }
    Ok(resolved)
}

/// Opens `path` in the file browser, reporting why it could not.
pub fn try_reveal(
    path: &Path,
    project: &ProjectLayout,
    browser: &dyn FileBrowser,
) -> Result<PathBuf, CaptureError> {
    let folder = resolve_folder(path, project)?;
    browser
        .open(&folder)
        .map_err(|source| CaptureError::RevealFailure {
            command: browser.command().to_string(),
            path: folder.clone(),
            source,
        })?;
    Ok(folder)
}

/// Opens `path` in the file browser; problems are logged, never returned.
pub fn reveal(path: &Path, project: &ProjectLayout, browser: &dyn FileBrowser) {
    if let Err(err) = try_reveal(path, project, browser) {
        log::warn!("Cannot open folder: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingBrowser {
        opened: Mutex<Vec<PathBuf>>,
        fail: bool,
    }

    impl FileBrowser for RecordingBrowser {
        fn command(&self) -> &str {
            "recorder"
        }

        fn open(&self, folder: &Path) -> io::Result<()> {
            if self.fail {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no opener"));
            }
            self.opened.lock().unwrap().push(folder.to_path_buf());
            Ok(())
        }
    }

    #[test]
    fn relative_folder_resolves_against_project_root() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(temp.path().join("Assets/Screenshots")).unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = RecordingBrowser::default();

        let folder = try_reveal(Path::new("Assets/Screenshots"), &project, &browser).unwrap();
        assert_eq!(folder, project.root().join("Assets/Screenshots"));
        assert_eq!(browser.opened.lock().unwrap().as_slice(), &[folder]);
    }

    #[test]
    fn blank_and_missing_folders_are_not_opened() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = RecordingBrowser::default();

        assert!(matches!(
            try_reveal(Path::new("  "), &project, &browser),
            Err(CaptureError::EmptyOutputPath)
        ));
        assert!(matches!(
            try_reveal(Path::new("missing"), &project, &browser),
            Err(CaptureError::FolderNotFound(_))
        ));

        reveal(Path::new("missing"), &project, &browser);
        assert!(browser.opened.lock().unwrap().is_empty());
    }

    #[test]
    fn launch_failure_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = RecordingBrowser {
            fail: true,
            ..Default::default()
        };

        let err = try_reveal(temp.path(), &project, &browser).unwrap_err();
        assert!(matches!(err, CaptureError::RevealFailure { .. }));
        assert!(err.to_string().contains("recorder"));
    }

    #[cfg(unix)]
    #[test]
    fn failing_opener_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = SystemFileBrowser::new(Some("false".into()));

        let err = try_reveal(temp.path(), &project, &browser).unwrap_err();
        match err {
            CaptureError::RevealFailure {
                ref command,
                ref source,
                ..
            } => {
                assert_eq!(command, "false");
                assert!(source.to_string().contains("exited with"));
            }
            other => panic!("expected RevealFailure, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn succeeding_opener_is_waited_on() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = SystemFileBrowser::new(Some("true".into()));

        let folder = try_reveal(temp.path(), &project, &browser).unwrap();
        assert_eq!(folder, project.root());
    }

    #[test]
    fn missing_opener_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        let project = ProjectLayout::new(temp.path(), "Assets");
        let browser = SystemFileBrowser::new(Some("camshot-no-such-opener".into()));

        assert!(matches!(
            try_reveal(temp.path(), &project, &browser),
            Err(CaptureError::RevealFailure { .. })
        ));
    }

    #[test]
    fn explorer_exit_status_is_ignored() {
        assert!(SystemFileBrowser::new(Some("explorer".into())).ignores_exit_status());
        assert!(SystemFileBrowser::new(Some("explorer.exe".into())).ignores_exit_status());
        assert!(!SystemFileBrowser::new(Some("xdg-open".into())).ignores_exit_status());
    }

    #[test]
    fn blank_override_uses_platform_opener() {
        assert_eq!(
            SystemFileBrowser::new(Some(" ".into())).command(),
            platform_opener()
        );
        assert_eq!(
            SystemFileBrowser::new(Some("thunar".into())).command(),
            "thunar"
        );
    }
}
