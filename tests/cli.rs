use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCENE: &str = r#"
main_camera = "front"

[[cameras]]
name = "front"
size = 1.0

[[cameras]]
name = "side"
position = [2.0, 0.0]

[[shapes]]
kind = "ellipse"
cx = 0.0
cy = 0.0
rx = 0.5
ry = 0.5
color = "red"
fill = true
"#;

/// Temp project directory holding a scene file; the config path inside it
/// does not exist, so every run starts from built-in defaults.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("scene.toml"), SCENE).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn config_path(&self) -> PathBuf {
        self.path().join("camshot.toml")
    }

    /// Runs with the default config location pointed into the temp dir.
    fn cmd_default_config(&self) -> Command {
        let mut cmd = Command::cargo_bin("camshot").expect("binary exists");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg"));
        cmd
    }

    fn cmd(&self) -> Command {
        let mut cmd = self.cmd_default_config();
        cmd.arg("--config").arg(self.config_path());
        cmd
    }

    fn pngs_in(&self, dir: &str) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.path().join(dir)) else {
            return Vec::new();
        };
        entries
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect()
    }
}

#[test]
fn help_prints_usage() {
    Command::cargo_bin("camshot")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Capture scene cameras to PNG at any resolution",
        ))
        .stdout(predicate::str::contains("--transparent"));
}

#[test]
fn opaque_capture_writes_named_png() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--width", "200", "--height", "100"])
        .args(["--opaque", "--output", "shots", "--prefix", "kv7 front"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kv7 front_"));

    let pngs = project.pngs_in("shots");
    assert_eq!(pngs.len(), 1);
    let name = pngs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("kv7 front_"), "unexpected name {name}");

    let image = image::open(&pngs[0]).unwrap();
    assert_eq!((image.width(), image.height()), (200, 100));
    assert!(!image.color().has_alpha());
}

#[test]
fn default_capture_is_transparent_and_indexed() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--width", "40", "--height", "40"])
        .assert()
        .success();

    let pngs = project.pngs_in("Assets/Screenshots");
    assert_eq!(pngs.len(), 1);
    let pixels = image::open(&pngs[0]).unwrap().to_rgba8();
    assert_eq!(pixels.get_pixel(0, 0).0[3], 0);
    assert_eq!(pixels.get_pixel(20, 20).0, [255, 0, 0, 255]);

    let manifest = fs::read_to_string(project.path().join(".camshot/asset-index.json")).unwrap();
    assert!(manifest.contains("Assets/Screenshots/screenshot_"));
}

#[test]
fn prefix_is_sanitized() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "-W", "8", "-H", "8"])
        .args(["--output", "out", "--prefix", "a/b:c"])
        .assert()
        .success();

    let pngs = project.pngs_in("out");
    assert_eq!(pngs.len(), 1);
    let name = pngs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("a_b_c_"), "unexpected name {name}");
}

#[test]
fn config_values_apply_and_flags_override_them() {
    let project = Project::new();
    fs::write(
        project.config_path(),
        "[capture]\nwidth = 30\nheight = 10\ntransparent_background = false\n\
         output_directory = \"from-config\"\nfile_prefix = \"cfg\"\n",
    )
    .unwrap();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--height", "20"])
        .assert()
        .success();

    let pngs = project.pngs_in("from-config");
    assert_eq!(pngs.len(), 1);
    let image = image::open(&pngs[0]).unwrap();
    assert_eq!((image.width(), image.height()), (30, 20));
    assert!(!image.color().has_alpha());
}

#[test]
fn empty_output_fails_without_writing() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--output", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Output path is empty"));

    let entries: Vec<_> = fs::read_dir(project.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("scene.toml")]);
}

#[test]
fn zero_resolution_is_rejected() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--width", "0", "--height", "-4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Width and height must be greater than 0",
        ));

    assert!(project.pngs_in("Assets/Screenshots").is_empty());
}

#[test]
fn unknown_camera_is_rejected() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--camera", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No camera selected"));
}

#[test]
fn capture_without_scene_has_no_camera() {
    let project = Project::new();

    project
        .cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("No camera selected"));
}

#[test]
fn transparent_and_opaque_conflict() {
    let project = Project::new();

    project
        .cmd()
        .args(["--transparent", "--opaque"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn list_cameras_marks_main_camera() {
    let project = Project::new();

    project
        .cmd()
        .args(["--scene", "scene.toml", "--list-cameras"])
        .assert()
        .success()
        .stdout(predicate::str::contains("front (main)"))
        .stdout(predicate::str::contains("side"));
}

#[test]
fn demo_scene_loads() {
    let project = Project::new();
    let demo = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/studio.toml");

    project
        .cmd()
        .arg("--scene")
        .arg(&demo)
        .arg("--list-cameras")
        .assert()
        .success()
        .stdout(predicate::str::contains("front (main)"))
        .stdout(predicate::str::contains("closeup"))
        .stdout(predicate::str::contains("overlay"));
}

#[test]
fn duplicate_camera_names_fail_to_load() {
    let project = Project::new();
    fs::write(
        project.path().join("dup.toml"),
        "[[cameras]]\nname = \"a\"\n\n[[cameras]]\nname = \"a\"\n",
    )
    .unwrap();

    project
        .cmd()
        .args(["--scene", "dup.toml", "--list-cameras"])
        .assert()
        .failure();
}

#[test]
fn reveal_missing_folder_fails() {
    let project = Project::new();

    project
        .cmd()
        .args(["--reveal", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Folder not found"));
}

#[cfg(unix)]
#[test]
fn failing_file_browser_is_reported() {
    let project = Project::new();
    fs::write(project.config_path(), "[shell]\nfile_browser = \"false\"\n").unwrap();

    project
        .cmd()
        .args(["--reveal", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to launch 'false'"))
        .stdout(predicate::str::contains("Opened").not());
}

#[cfg(target_os = "linux")]
#[test]
fn default_config_location_is_read() {
    let project = Project::new();
    let config_dir = project.path().join("xdg").join("camshot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[capture]\nwidth = 12\nheight = 6\noutput_directory = \"xdg-shots\"\n",
    )
    .unwrap();

    project
        .cmd_default_config()
        .args(["--scene", "scene.toml"])
        .assert()
        .success();

    let pngs = project.pngs_in("xdg-shots");
    assert_eq!(pngs.len(), 1);
    let image = image::open(&pngs[0]).unwrap();
    assert_eq!((image.width(), image.height()), (12, 6));
}

#[test]
fn init_config_writes_once() {
    let project = Project::new();

    project
        .cmd()
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created default config"));

    let written = fs::read_to_string(project.config_path()).unwrap();
    assert!(written.contains("[capture]"));

    project
        .cmd()
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_config_is_reported() {
    let project = Project::new();
    fs::write(project.config_path(), "[capture\nwidth = ").unwrap();

    project
        .cmd()
        .args(["--scene", "scene.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
