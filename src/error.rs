//! Error types for render backend initialization.
//!
//! Only backend-initialization failures surface to the top-level driver;
//! everything else (bounds errors, per-chunk generation problems, missing
//! textures) is absorbed at the component boundary.

use thiserror::Error;

/// A fatal failure while bringing up the GPU-backed render backend.
///
/// Any of these aborts startup with a diagnosable cause rather than letting
/// the engine render a corrupt frame.
#[derive(Debug, Error)]
pub enum RenderInitError {
    /// No GPU adapter satisfied the surface/power requirements.
    #[error("no suitable GPU adapter found: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to hand out a device with the requested limits.
    #[error("failed to acquire GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The window surface could not be created.
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// The chunk shader failed to read from disk.
    #[error("failed to read shader source at {path}: {source}")]
    ShaderSource {
        /// Path the shader was expected at.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The chunk shader failed validation.
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),
}
