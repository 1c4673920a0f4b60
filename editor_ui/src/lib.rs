//! Notepad UI - window, rendering, dialogs and input handling.
//!
//! This crate draws the document with wgpu, maps winit input to editor
//! commands and implements the controller's [`Shell`](notepad_core::Shell)
//! with native dialogs.

pub mod app;
pub mod dialogs;
pub mod error;
pub mod font;
pub mod gpu_renderer;
pub mod input;
pub mod layout;

pub use app::{run, EditorApp};
pub use dialogs::DesktopShell;
pub use error::UiError;
pub use gpu_renderer::GpuRenderer;
