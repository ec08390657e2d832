//! # Engine State Module
//!
//! The central coordinator tying the engine's subsystems together:
//!
//! * `camera_state` - observer position, projection and frustum math
//! * `voxels` - blocks, chunks, terrain generation and the world streamer
//! * `rendering` - the GPU-backed render backend
//!
//! `EngineState` owns one of each and drives them from the frame callback:
//! every frame applies pending camera input, advances the world's streaming
//! tick with the observer's position, and renders the visible chunk set.
//! All of it runs on the single control thread that owns the graphics
//! context.

use std::time::{Duration, Instant};

use cgmath::{Deg, Point3};
use log::info;

use crate::config::EngineConfig;
use crate::error::RenderInitError;

pub mod camera_state;
pub mod rendering;
pub mod voxels;

use camera_state::{Camera, CameraController, MovementKey};
use rendering::{RenderBackend, RenderStats};
use voxels::world::World;

/// Units per second the fly camera moves at.
const CAMERA_SPEED: f32 = 24.0;
/// Mouse-look sensitivity multiplier.
const CAMERA_SENSITIVITY: f32 = 0.25;
/// How often accumulated frame statistics are logged.
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// The live engine: world, camera and render backend.
pub struct EngineState {
    /// The streamed voxel world.
    pub world: World,
    /// The observer.
    pub camera: Camera,
    /// Accumulates input between frames.
    pub controller: CameraController,
    renderer: RenderBackend,
    last_stats: RenderStats,
    last_stats_log: Instant,
    frames_since_log: u32,
}

impl EngineState {
    /// Builds the engine around an already-initialized surface and device.
    ///
    /// The camera starts above the terrain's maximum height in the middle of
    /// the origin chunk, looking along +X.
    pub fn new(
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
        device: wgpu::Device,
        queue: wgpu::Queue,
        shader_source: &str,
        config: &EngineConfig,
    ) -> Result<Self, RenderInitError> {
        let renderer = RenderBackend::new(
            surface,
            surface_config,
            device,
            queue,
            shader_source,
            config,
        )?;

        let spawn_height =
            (config.terrain.height_offset + config.terrain.height_scale) as f32 + 8.0;
        let camera = Camera::new(
            Point3::new(config.chunk_size as f32 / 2.0, spawn_height, config.chunk_size as f32 / 2.0),
            Deg(0.0),
            Deg(-20.0),
        );

        Ok(EngineState {
            world: World::new(config),
            camera,
            controller: CameraController::new(CAMERA_SPEED, CAMERA_SENSITIVITY),
            renderer,
            last_stats: RenderStats::default(),
            last_stats_log: Instant::now(),
            frames_since_log: 0,
        })
    }

    /// Advances one frame: applies input, runs the streaming tick.
    pub fn update(&mut self, dt: Duration) {
        self.camera.apply_controller(&mut self.controller, dt);
        self.world.update(self.camera.position, dt);
    }

    /// Renders the frame and folds the result into the once-a-second
    /// statistics log.
    pub fn render(&mut self) {
        self.last_stats = self.renderer.render_world(&self.world, &self.camera);
        self.frames_since_log += 1;

        if self.last_stats_log.elapsed() >= STATS_LOG_INTERVAL {
            info!(
                "{} fps | {} chunks drawn ({} loaded, {} queued) | {} vertices | {} draw calls",
                self.frames_since_log,
                self.last_stats.chunks,
                self.world.loaded_count(),
                self.world.pending_load_count(),
                self.last_stats.vertices,
                self.last_stats.draw_calls,
            );
            self.last_stats_log = Instant::now();
            self.frames_since_log = 0;
        }
    }

    /// Statistics from the most recent frame.
    pub fn last_stats(&self) -> RenderStats {
        self.last_stats
    }

    /// Forwards a viewport resize to the render backend.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.renderer.handle_resize(width, height);
    }

    /// Applies a changed configuration to the render backend.
    pub fn update_config(&mut self, config: &EngineConfig) {
        self.renderer.update_config(config);
    }

    /// Routes a movement key state change into the camera controller.
    pub fn handle_movement_key(&mut self, key: MovementKey, pressed: bool) {
        self.controller.set_movement(key, pressed);
    }

    /// Routes relative mouse motion into the camera controller.
    pub fn handle_mouse_delta(&mut self, delta_x: f64, delta_y: f64) {
        self.controller.add_mouse_delta(delta_x, delta_y);
    }
}
