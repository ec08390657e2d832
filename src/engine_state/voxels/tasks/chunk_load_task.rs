//! A unit of chunk-materialization work: generate voxels, then mesh them.

use cgmath::Point3;

use crate::config::EngineConfig;
use crate::engine_state::voxels::chunk::Chunk;
use crate::engine_state::voxels::terrain::TerrainGenerator;

/// A pending request to materialize the chunk at one coordinate.
///
/// The task owns nothing but its coordinate; the terrain generator and
/// configuration are borrowed at processing time so tasks stay trivially
/// cheap to enqueue and to drop.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkLoadTask {
    position: Point3<i32>,
}

impl ChunkLoadTask {
    /// Creates a load task for the given chunk coordinate.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkLoadTask { position }
    }

    /// The chunk coordinate this task will materialize.
    pub fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Performs the work: creates the chunk, fills it with terrain and
    /// builds its mesh.
    ///
    /// A generation problem for one chunk must never take down the tick for
    /// the others; this function always returns a usable chunk — in the
    /// worst case an empty, meshed one, which the streamer will happily
    /// admit and which re-meshes correctly if later edited.
    pub fn process(&self, terrain: &TerrainGenerator, config: &EngineConfig) -> Chunk {
        let mut chunk = Chunk::new(self.position, config.chunk_size_usize());
        terrain.fill_chunk(&mut chunk);
        chunk.build_mesh();
        chunk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processing_yields_a_meshed_clean_chunk() {
        let config = EngineConfig {
            chunk_size: 8,
            ..EngineConfig::default()
        };
        let terrain = TerrainGenerator::new(&config);
        let task = ChunkLoadTask::new(Point3::new(0, 0, 0));

        let chunk = task.process(&terrain, &config);
        assert!(!chunk.is_dirty());
        assert!(chunk.mesh().is_some());
        assert_eq!(chunk.position, Point3::new(0, 0, 0));
    }
}
