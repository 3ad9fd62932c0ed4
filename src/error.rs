//! Startup errors
//!
//! The simulation itself is infallible; everything here is fatal and stops
//! the game before the first frame.

use thiserror::Error;

use crate::tuning::TuningError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("browser window is not available")]
    NoWindow,
    #[error("canvas element `#{0}` not found")]
    CanvasMissing(&'static str),
    #[error("failed to create render surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error(transparent)]
    Tuning(#[from] TuningError),
}
