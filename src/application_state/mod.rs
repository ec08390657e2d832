//! # Application State Module
//!
//! The window-facing shell around the engine: window creation, the frame
//! callback, and the translation of window events into engine calls. This
//! layer owns nothing GPU-side itself; it builds the [`EngineState`] once
//! the window exists and then forwards resize, redraw and input events.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::EngineConfig;
use crate::engine_state::camera_state::MovementKey;
use crate::engine_state::EngineState;
use crate::error::RenderInitError;

pub mod graphics_resources_builder;

/// Path the chunk shader is loaded from at startup.
const SHADER_PATH: &str = "assets/shaders/chunk.wgsl";

/// The winit-driven application: a window plus the engine behind it.
pub struct ApplicationState {
    config: EngineConfig,
    window: Option<Arc<Window>>,
    state: Option<EngineState>,
    last_frame: Instant,
}

impl ApplicationState {
    /// Creates the application shell; the engine itself is built lazily in
    /// `resumed`, once the event loop hands us a window.
    pub fn new(config: EngineConfig) -> Self {
        ApplicationState {
            config,
            window: None,
            state: None,
            last_frame: Instant::now(),
        }
    }

    fn build_engine(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderInitError> {
        let window = Arc::new(
            event_loop
                .create_window(Window::default_attributes().with_title("blockworld"))
                .expect("window creation failed"),
        );

        let graphics = pollster::block_on(graphics_resources_builder::create_graphics(
            window.clone(),
        ))?;

        let shader_source = std::fs::read_to_string(Path::new(SHADER_PATH)).map_err(|e| {
            RenderInitError::ShaderSource {
                path: SHADER_PATH.to_string(),
                source: e,
            }
        })?;

        let state = EngineState::new(
            graphics.surface,
            graphics.surface_config,
            graphics.device,
            graphics.queue,
            &shader_source,
            &self.config,
        )?;

        info!("Engine initialized (seed {})", self.config.seed);
        window.request_redraw();
        self.window = Some(window);
        self.state = Some(state);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn movement_key(code: KeyCode) -> Option<MovementKey> {
        match code {
            KeyCode::KeyW => Some(MovementKey::Forward),
            KeyCode::KeyS => Some(MovementKey::Backward),
            KeyCode::KeyA => Some(MovementKey::Left),
            KeyCode::KeyD => Some(MovementKey::Right),
            KeyCode::Space => Some(MovementKey::Up),
            KeyCode::ShiftLeft => Some(MovementKey::Down),
            _ => None,
        }
    }
}

impl ApplicationHandler for ApplicationState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(e) = self.build_engine(event_loop) {
            // The one error class that surfaces to the driver: report it
            // and halt startup rather than render a corrupt frame.
            error!("Render backend initialization failed: {e}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                state.handle_resize(size.width, size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else if let Some(key) = Self::movement_key(code) {
                    state.handle_movement_key(key, key_state == ElementState::Pressed);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let dt = now - self.last_frame;
                self.last_frame = now;

                state.update(dt);
                state.render();

                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(state) = self.state.as_mut() {
                state.handle_mouse_delta(dx, dy);
            }
        }
    }
}
