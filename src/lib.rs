#![warn(missing_docs)]

//! # blockworld
//!
//! A real-time streamed voxel block world built on Rust and WGPU.
//!
//! The core of the crate is the chunk lifecycle and meshing pipeline: the
//! world is partitioned into fixed-size voxel chunks, chunks are populated
//! procedurally from a seed, voxel grids are turned into triangle meshes by
//! local-neighbor face culling, and a streaming policy loads and unloads
//! chunks around the observer under explicit per-tick work caps.
//!
//! ## Key Modules
//!
//! * `application_state` - window management and the frame callback
//! * `config` - the explicit configuration value handed to every component
//! * `engine_state` - world streaming, terrain, meshing and rendering
//!
//! ## Architecture
//!
//! Data flows one way each frame: observer position → chunk selection →
//! load tasks → chunk voxel population → mesh build → admission to the
//! active set → camera-filtered, distance-sorted rendering. All state is
//! reconstructible from `(seed, chunk coordinate)`; nothing is persisted.

use log::info;
use winit::event_loop::EventLoop;

use application_state::ApplicationState;

mod application_state;
pub mod config;
mod engine_state;
pub mod error;

pub use config::EngineConfig;
pub use engine_state::camera_state::{Camera, CameraController, CameraView, MovementKey};
pub use engine_state::rendering::RenderStats;
pub use engine_state::voxels::block::{block_type::BlockType, BlockId};
pub use engine_state::voxels::world::World;
pub use engine_state::EngineState;

/// Path the optional configuration override is read from.
const CONFIG_PATH: &str = "blockworld.json";

/// Initializes logging, loads configuration and runs the engine until the
/// window closes.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");
    let config = EngineConfig::load_or_default(CONFIG_PATH);

    let event_loop = EventLoop::new().expect("event loop creation failed");
    let mut state = ApplicationState::new(config);
    let _ = event_loop.run_app(&mut state);
}
