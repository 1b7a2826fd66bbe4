use dear_imgui_mesh::{InitError, RenderError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Window handle error: {0}")]
    WindowHandle(#[from] raw_window_handle::HandleError),
    #[error("OpenGL context error: {0}")]
    Gl(#[from] glutin::error::Error),
    #[error("Window creation error: {0}")]
    WindowCreation(String),
    #[error("Device initialization error: {0}")]
    Device(#[from] InitError),
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

pub type ViewerResult<T> = Result<T, ViewerError>;
