//! # Engine Configuration
//!
//! This module defines the configuration structure that is passed explicitly
//! into every component constructor. No component reads ambient global state;
//! the `EngineConfig` value created at startup is the single source of tuning
//! parameters for streaming, terrain generation and rendering.
//!
//! Configuration is loaded from an optional `blockworld.json` next to the
//! binary. A missing file falls back to the compiled defaults; a malformed
//! file is logged and also falls back, so a bad edit never prevents startup.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Tuning parameters for the whole engine.
///
/// The streaming fields deserve a note:
/// - `render_distance` is a radius in *chunks* on the (x, z) plane; the
///   vertical axis always spans the full `world_height_in_chunks` range.
/// - `max_chunks_per_frame` caps how many load operations and how many unload
///   operations a single streaming tick may process. It is the system's only
///   backpressure mechanism against bursts of observer movement and must stay
///   an explicit, tunable value.
/// - `chunk_update_interval_ms` throttles the chunk selection pass itself;
///   selection runs at most once per interval, not per frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World-space edge length of a cubic chunk, in blocks.
    pub chunk_size: i32,
    /// Number of vertically stacked chunks the world spans.
    pub world_height_in_chunks: i32,
    /// Streaming radius around the observer, in chunks, on the (x, z) plane.
    pub render_distance: i32,
    /// Vertical field of view in degrees.
    pub field_of_view_deg: f32,
    /// Per-tick cap on load operations and (independently) unload operations.
    pub max_chunks_per_frame: usize,
    /// Minimum milliseconds between two chunk selection passes.
    pub chunk_update_interval_ms: u64,
    /// World seed. Same seed, same world, every run.
    pub seed: u32,
    /// Noise parameters for the terrain height function.
    pub noise: NoiseParams,
    /// Terrain band thresholds.
    pub terrain: TerrainParams,
}

/// Fractional Brownian motion parameters for the terrain height function.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseParams {
    /// Base sampling frequency applied to world coordinates.
    pub scale: f64,
    /// Number of noise octaves summed per sample.
    pub octaves: u32,
    /// Amplitude multiplier applied per octave.
    pub persistence: f64,
    /// Frequency multiplier applied per octave.
    pub lacunarity: f64,
}

/// Height shaping and material band thresholds for terrain generation.
///
/// Columns are classified by depth below the surface: depth zero is the
/// grass surface, depths up to `soil_depth` are soil, everything deeper is
/// stone, and any voxel below `bedrock_height` is bedrock regardless of depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Multiplier mapping normalized [0, 1] noise to world height.
    pub height_scale: f64,
    /// Constant added to the scaled height.
    pub height_offset: f64,
    /// Maximum depth-from-surface (in blocks) of the soil band.
    pub soil_depth: i32,
    /// World height below which every voxel is bedrock.
    pub bedrock_height: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_size: 16,
            world_height_in_chunks: 4,
            render_distance: 6,
            field_of_view_deg: 70.0,
            max_chunks_per_frame: 4,
            chunk_update_interval_ms: 250,
            seed: 0,
            noise: NoiseParams::default(),
            terrain: TerrainParams::default(),
        }
    }
}

impl Default for NoiseParams {
    fn default() -> Self {
        NoiseParams {
            scale: 0.01,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            height_scale: 30.0,
            height_offset: 5.0,
            soil_depth: 4,
            bedrock_height: 2,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from `path`, falling back to defaults.
    ///
    /// A missing file is normal (first run); a file that fails to parse is
    /// reported at `warn` level and ignored.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!(
                        "Ignoring malformed configuration at {}: {}",
                        path.display(),
                        e
                    );
                    EngineConfig::default()
                }
            },
            Err(_) => EngineConfig::default(),
        }
    }

    /// Side length of a chunk as a `usize`, for voxel-grid indexing.
    pub fn chunk_size_usize(&self) -> usize {
        self.chunk_size as usize
    }

    /// World-space height of the whole world, in blocks.
    pub fn world_height(&self) -> i32 {
        self.world_height_in_chunks * self.chunk_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = EngineConfig::default();
        assert_eq!(config.chunk_size, 16);
        assert!(config.render_distance > 0);
        assert!(config.max_chunks_per_frame > 0);
        assert_eq!(config.world_height(), 64);
    }

    #[test]
    fn partial_json_overrides_only_named_fields() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"render_distance": 2, "seed": 99}"#).unwrap();
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.seed, 99);
        // Everything else keeps its default.
        assert_eq!(config.chunk_size, 16);
        assert_eq!(config.noise.octaves, 4);
    }

    #[test]
    fn round_trips_through_json() {
        let config = EngineConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.chunk_size, config.chunk_size);
        assert_eq!(back.noise.lacunarity, config.noise.lacunarity);
        assert_eq!(back.terrain.soil_depth, config.terrain.soil_depth);
    }
}
