//! # Graphics Resources Builder
//!
//! This module handles the creation of the graphics resources the engine
//! needs: the window surface, the adapter, and the device/queue pair.
//!
//! Initialization is the one phase where graphics failures are fatal: every
//! step returns a [`RenderInitError`] with a diagnosable cause instead of
//! panicking, and the application shell surfaces it and halts startup.

use std::sync::Arc;

use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

use crate::error::RenderInitError;

/// The graphics resources required by the render backend.
pub struct Graphics {
    /// The rendering surface tied to the window.
    pub surface: Surface<'static>,
    /// Configuration the surface was last configured with.
    pub surface_config: SurfaceConfiguration,
    /// The device used for creating GPU resources.
    pub device: Device,
    /// The queue for submitting command buffers.
    pub queue: Queue,
}

/// Asynchronously creates and initializes all required graphics resources.
///
/// # Arguments
/// * `window` - The window to create the rendering surface for
///
/// # Errors
/// Returns a [`RenderInitError`] when no adapter is compatible with the
/// surface, when the device request is refused, or when surface creation
/// itself fails.
pub async fn create_graphics(window: Arc<Window>) -> Result<Graphics, RenderInitError> {
    // The instance is a handle to the GPU.
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance.create_surface(window.clone())?;

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        })
        .await?;

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            label: None,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::Off,
        })
        .await?;

    let size = window.inner_size();
    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps
        .formats
        .iter()
        .find(|format| format.is_srgb())
        .copied()
        .unwrap_or(surface_caps.formats[0]);
    let surface_config = SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: size.width.max(1),
        height: size.height.max(1),
        present_mode: surface_caps.present_modes[0],
        alpha_mode: surface_caps.alpha_modes[0],
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &surface_config);

    Ok(Graphics {
        surface,
        surface_config,
        device,
        queue,
    })
}
