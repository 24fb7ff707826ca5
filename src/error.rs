//! Error types for the viewer.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("no compatible graphics adapter found: {0}")]
    AdapterUnavailable(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("surface error: {0}")]
    Surface(String),

    #[error("failed to load model {path}: {source}")]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("model {0} contains no triangles")]
    EmptyModel(PathBuf),

    #[error("failed to load texture {path}: {reason}")]
    TextureLoad { path: PathBuf, reason: String },

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl From<wgpu::CreateSurfaceError> for ViewerError {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        ViewerError::Surface(err.to_string())
    }
}

impl From<wgpu::SurfaceError> for ViewerError {
    fn from(err: wgpu::SurfaceError) -> Self {
        ViewerError::Surface(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
