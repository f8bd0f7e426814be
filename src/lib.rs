//! Offscreen camera capture to PNG.
//!
//! Renders a scene camera into a dedicated offscreen buffer, saves the frame
//! with a sanitized timestamped name, and leaves every camera and render
//! target setting exactly as it found it. The binary drives this library from
//! the command line; other tools can embed [`capture::CaptureController`] with
//! their own [`render::RenderBackend`].

pub mod capture;
pub mod config;
pub mod project;
pub mod render;
pub mod reveal;
pub mod scene;

pub use config::Config;
