//! Start-up failures of the desktop shell.

use thiserror::Error;

/// Errors that stop the window from coming up.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("no usable monospace font found (tried {tried} locations)")]
    NoFont { tried: usize },

    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no compatible GPU adapter")]
    NoAdapter,

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
