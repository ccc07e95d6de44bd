//! Viewer-level errors.
//!
//! Startup failures (no window, no GPU, a broken model) end the event loop and
//! come back out of [`Viewer::run`](crate::viewer::Viewer::run). Config and
//! view-preset I/O failures use the same type so callers see one error enum.

use std::fmt;
use std::path::PathBuf;

use crate::mesh::GeometryError;

/// Errors that can occur while starting or running the viewer.
#[derive(Debug)]
pub enum ViewerError {
    /// The winit event loop could not be created or failed while running.
    EventLoop(winit::error::EventLoopError),
    /// The OS refused to create a window.
    Window(winit::error::OsError),
    /// wgpu could not create a surface for the window.
    Surface(wgpu::CreateSurfaceError),
    /// No GPU adapter is compatible with the window surface.
    Adapter(wgpu::RequestAdapterError),
    /// The adapter refused to hand out a device.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no texture formats for this adapter.
    NoSurfaceFormat,
    /// The assembled model breaks a buffer invariant.
    Geometry(GeometryError),
    /// Reading or writing a config / preset file failed.
    Io { path: PathBuf, source: std::io::Error },
    /// A config / preset document is not valid JSON for its type.
    Json {
        path: Option<PathBuf>,
        source: serde_json::Error,
    },
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewerError::EventLoop(e) => write!(f, "event loop error: {e}"),
            ViewerError::Window(e) => write!(f, "failed to create window: {e}"),
            ViewerError::Surface(e) => write!(f, "failed to create surface: {e}"),
            ViewerError::Adapter(e) => write!(f, "no suitable GPU adapter: {e}"),
            ViewerError::Device(e) => write!(f, "failed to create GPU device: {e}"),
            ViewerError::NoSurfaceFormat => write!(f, "surface supports no texture formats"),
            ViewerError::Geometry(e) => write!(f, "invalid model geometry: {e}"),
            ViewerError::Io { path, source } => write!(f, "{}: {source}", path.display()),
            ViewerError::Json {
                path: Some(path),
                source,
            } => write!(f, "{}: {source}", path.display()),
            ViewerError::Json { path: None, source } => write!(f, "invalid JSON: {source}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::EventLoop(e) => Some(e),
            ViewerError::Window(e) => Some(e),
            ViewerError::Surface(e) => Some(e),
            ViewerError::Adapter(e) => Some(e),
            ViewerError::Device(e) => Some(e),
            ViewerError::NoSurfaceFormat => None,
            ViewerError::Geometry(e) => Some(e),
            ViewerError::Io { source, .. } => Some(source),
            ViewerError::Json { source, .. } => Some(source),
        }
    }
}

impl From<GeometryError> for ViewerError {
    fn from(e: GeometryError) -> Self {
        ViewerError::Geometry(e)
    }
}

impl From<winit::error::EventLoopError> for ViewerError {
    fn from(e: winit::error::EventLoopError) -> Self {
        ViewerError::EventLoop(e)
    }
}
