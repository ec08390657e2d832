//! # Terrain Generation Module
//!
//! This module provides the `TerrainGenerator`, a pure function of world
//! coordinates and a fixed seed. Column heights come from fractional
//! Brownian motion over Perlin noise; voxels below the surface are
//! classified into grass / soil / stone / bedrock bands by their depth.
//!
//! ## Determinism
//!
//! The generator holds no mutable state. The same seed and the same chunk
//! coordinate produce a bit-identical voxel grid on every call, which is
//! what makes the whole world reconstructible without persistence.

use noise::{NoiseFn, Perlin};

use crate::config::{EngineConfig, NoiseParams, TerrainParams};

use super::block::block_type::BlockType;
use super::chunk::Chunk;

/// Procedural terrain generator for chunk population.
///
/// Stateless with respect to the world: only the seed, the noise parameters
/// and the band thresholds influence its output.
pub struct TerrainGenerator {
    perlin: Perlin,
    noise: NoiseParams,
    terrain: TerrainParams,
    world_height: i32,
}

impl TerrainGenerator {
    /// Creates a generator from the engine configuration.
    pub fn new(config: &EngineConfig) -> Self {
        TerrainGenerator {
            perlin: Perlin::new(config.seed),
            noise: config.noise.clone(),
            terrain: config.terrain.clone(),
            world_height: config.world_height(),
        }
    }

    /// Computes the terrain column height at a world (x, z) position.
    ///
    /// Sums `octaves` Perlin samples at geometrically increasing frequency
    /// and geometrically decreasing amplitude, normalizes by the maximum
    /// possible amplitude sum, remaps the [-1, 1] result to [0, 1] and
    /// scales it into the configured height range. The result is floored to
    /// an integer block height.
    pub fn height_at(&self, world_x: i32, world_z: i32) -> i32 {
        let mut frequency = self.noise.scale;
        let mut amplitude = 1.0;
        let mut sum = 0.0;
        let mut amplitude_sum = 0.0;

        for _ in 0..self.noise.octaves {
            sum += amplitude
                * self
                    .perlin
                    .get([world_x as f64 * frequency, world_z as f64 * frequency]);
            amplitude_sum += amplitude;
            amplitude *= self.noise.persistence;
            frequency *= self.noise.lacunarity;
        }

        let normalized = (sum / amplitude_sum + 1.0) * 0.5;
        let height = normalized * self.terrain.height_scale + self.terrain.height_offset;
        (height.floor() as i32).clamp(0, self.world_height - 1)
    }

    /// Classifies one voxel by its world height and the column's surface
    /// height. Only called for voxels at or below the surface.
    fn classify(&self, world_y: i32, surface_height: i32) -> BlockType {
        if world_y < self.terrain.bedrock_height {
            BlockType::BEDROCK
        } else if world_y == surface_height {
            BlockType::GRASS
        } else if surface_height - world_y <= self.terrain.soil_depth {
            BlockType::SOIL
        } else {
            BlockType::STONE
        }
    }

    /// Fills a chunk's voxel grid with terrain.
    ///
    /// For every local (x, z) column the world height is computed once; every
    /// voxel at or below it is written through the chunk's block accessor.
    /// The caller is expected to invoke `build_mesh` afterwards.
    pub fn fill_chunk(&self, chunk: &mut Chunk) {
        let size = chunk.size() as i32;
        let origin_x = chunk.position.x * size;
        let origin_y = chunk.position.y * size;
        let origin_z = chunk.position.z * size;

        for z in 0..size {
            for x in 0..size {
                let surface_height = self.height_at(origin_x + x, origin_z + z);
                for y in 0..size {
                    let world_y = origin_y + y;
                    if world_y > surface_height {
                        break;
                    }
                    let block_type = self.classify(world_y, surface_height);
                    chunk.set_block_at(x, y, z, block_type.id());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use super::*;

    fn test_config() -> EngineConfig {
        EngineConfig {
            chunk_size: 8,
            world_height_in_chunks: 4,
            seed: 1234,
            ..EngineConfig::default()
        }
    }

    fn fill(position: Point3<i32>, config: &EngineConfig) -> Chunk {
        let generator = TerrainGenerator::new(config);
        let mut chunk = Chunk::new(position, config.chunk_size_usize());
        generator.fill_chunk(&mut chunk);
        chunk
    }

    #[test]
    fn same_seed_and_coordinate_is_bit_identical() {
        let config = test_config();
        let position = Point3::new(3, 0, -2);
        let first = fill(position, &config);
        let second = fill(position, &config);

        let size = config.chunk_size;
        for z in 0..size {
            for y in 0..size {
                for x in 0..size {
                    assert_eq!(first.block_at(x, y, z), second.block_at(x, y, z));
                }
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let config_a = test_config();
        let config_b = EngineConfig {
            seed: 4321,
            ..test_config()
        };
        let generator_a = TerrainGenerator::new(&config_a);
        let generator_b = TerrainGenerator::new(&config_b);

        let mut differs = false;
        for world_x in 0..64 {
            if generator_a.height_at(world_x, 0) != generator_b.height_at(world_x, 0) {
                differs = true;
                break;
            }
        }
        assert!(differs, "two seeds produced identical height profiles");
    }

    #[test]
    fn heights_stay_inside_the_configured_range() {
        let config = test_config();
        let generator = TerrainGenerator::new(&config);
        let minimum = config.terrain.height_offset.floor() as i32 - 1;
        let maximum =
            (config.terrain.height_offset + config.terrain.height_scale).ceil() as i32 + 1;

        for world_x in -50..50 {
            for world_z in -50..50 {
                let height = generator.height_at(world_x * 7, world_z * 7);
                assert!(height >= minimum.max(0), "height {} under range", height);
                assert!(height <= maximum, "height {} over range", height);
            }
        }
    }

    #[test]
    fn columns_are_banded_by_depth() {
        let config = test_config();
        let generator = TerrainGenerator::new(&config);
        let size = config.chunk_size;

        // Look at the chunk layer that actually contains the surface.
        let surface_height = generator.height_at(4, 4);
        let surface_chunk_y = surface_height.div_euclid(size);
        let local_surface_y = surface_height.rem_euclid(size);
        let chunk = fill(Point3::new(0, surface_chunk_y, 0), &config);

        assert_eq!(
            chunk.block_at(4, local_surface_y, 4),
            BlockType::GRASS.id()
        );
        if local_surface_y + 1 < size {
            assert_eq!(
                chunk.block_at(4, local_surface_y + 1, 4),
                crate::engine_state::voxels::block::AIR
            );
        }
        if local_surface_y >= 1 {
            assert_eq!(
                chunk.block_at(4, local_surface_y - 1, 4),
                BlockType::SOIL.id()
            );
        }

        // The bottom chunk holds the bedrock band.
        let bottom = fill(Point3::new(0, 0, 0), &config);
        for world_y in 0..config.terrain.bedrock_height.min(size) {
            assert_eq!(bottom.block_at(4, world_y, 4), BlockType::BEDROCK.id());
        }
    }

    #[test]
    fn upper_chunks_above_terrain_stay_empty() {
        let config = test_config();
        // Terrain tops out around height_offset + height_scale = 35; a chunk
        // whose origin starts above that must remain all air.
        let chunk = fill(Point3::new(0, 5, 0), &config);
        assert!(chunk.is_empty());
    }
}
