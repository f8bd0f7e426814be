use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use camshot::Config;
use camshot::capture::{CaptureController, CaptureDependencies, CaptureRequest};
use camshot::project::ProjectLayout;
use camshot::render::{RenderBackend, SoftwareBackend};
use camshot::scene::Scene;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CAMSHOT_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "camshot")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "Capture scene cameras to PNG at any resolution")]
struct Cli {
    /// Scene file to render (TOML)
    #[arg(long, short = 's', value_name = "FILE")]
    scene: Option<PathBuf>,

    /// Camera to capture (defaults to the scene's main camera)
    #[arg(long, short = 'c', value_name = "NAME")]
    camera: Option<String>,

    /// Output width in pixels
    #[arg(long, short = 'W', value_name = "PX", allow_negative_numbers = true)]
    width: Option<i32>,

    /// Output height in pixels
    #[arg(long, short = 'H', value_name = "PX", allow_negative_numbers = true)]
    height: Option<i32>,

    /// Render with a transparent background and keep the alpha channel
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "opaque")]
    transparent: bool,

    /// Render the camera's normal background and drop the alpha channel
    #[arg(long, action = ArgAction::SetTrue)]
    opaque: bool,

    /// Output directory (absolute or relative to the project root)
    #[arg(long, short = 'o', value_name = "DIR")]
    output: Option<String>,

    /// Filename prefix
    #[arg(long, short = 'p', value_name = "PREFIX")]
    prefix: Option<String>,

    /// Open the output folder after a successful capture
    #[arg(long, action = ArgAction::SetTrue)]
    open: bool,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List the scene's cameras and exit
    #[arg(long, action = ArgAction::SetTrue)]
    list_cameras: bool,

    /// Open a folder (default: the configured output directory) and exit
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    reveal: Option<Option<String>>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        Config::create_default_file(&config_path)?;
        println!("Created default config at {}", config_path.display());
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let project = ProjectLayout::from_config(&config.project);
    log::debug!("Project root: {}", project.root().display());

    let scene = match &cli.scene {
        Some(path) => Scene::load(path)?,
        None => {
            log::warn!("No scene file given, rendering an empty scene");
            Scene::default()
        }
    };
    let backend = SoftwareBackend::new(scene);

    if cli.list_cameras {
        list_cameras(&backend);
        return Ok(());
    }

    let dependencies = CaptureDependencies::with_file_browser(config.shell.file_browser.clone());
    let mut controller = CaptureController::with_dependencies(backend, project, dependencies);

    if let Some(folder) = &cli.reveal {
        let folder = folder
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| config.capture.output_directory.clone());
        let opened = controller.try_reveal(&folder)?;
        println!("Opened {}", opened.display());
        return Ok(());
    }

    let camera = match &cli.camera {
        Some(name) => {
            let handle = controller.backend().find_camera(name);
            if handle.is_none() {
                log::error!("Scene has no camera named '{}'", name);
            }
            handle
        }
        None => controller.backend().main_camera(),
    };

    let request = build_request(&cli, camera, &config);
    let result = controller
        .capture(&request)
        .context("Screenshot capture failed")?;

    println!("{}", result.saved_path.display());

    if cli.open || config.capture.open_folder_after_capture {
        controller.reveal_capture(&result);
    }

    Ok(())
}

fn build_request(
    cli: &Cli,
    camera: Option<camshot::render::CameraHandle>,
    config: &Config,
) -> CaptureRequest {
    let mut request = CaptureRequest::from_config(camera, &config.capture);

    if let Some(width) = cli.width {
        request.width = width;
    }
    if let Some(height) = cli.height {
        request.height = height;
    }
    if cli.transparent {
        request.transparent_background = true;
    } else if cli.opaque {
        request.transparent_background = false;
    }
    if let Some(output) = &cli.output {
        request.output_directory = PathBuf::from(output);
    }
    if let Some(prefix) = &cli.prefix {
        request.file_prefix = prefix.clone();
    }

    request
}

fn list_cameras(backend: &SoftwareBackend) {
    let main = backend.main_camera();
    let mut any = false;

    for name in backend.camera_names() {
        any = true;
        let handle = backend.find_camera(name);
        let state = handle.and_then(|handle| backend.camera_state(handle));
        let marker = if handle.is_some() && handle == main {
            " (main)"
        } else {
            ""
        };
        match state {
            Some(state) => println!("{}{}\tclear: {:?}", name, marker, state.clear_mode),
            None => println!("{}{}", name, marker),
        }
    }

    if !any {
        eprintln!("Scene has no cameras");
    }
}
