//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a fixed-size cubic region of
//! voxel data and the unit of loading, meshing and rendering.
//!
//! ## Storage
//!
//! A chunk owns a dense array of `size³` block codes in row-major order
//! (x fastest, then y, then z). The grid is exclusively owned by the chunk;
//! the world never inspects raw voxels and always goes through the block
//! accessors.
//!
//! ## Meshing
//!
//! `build_mesh` performs face culling by local neighbor occlusion: a face is
//! emitted iff the adjacent cell in that direction is empty. Out-of-range
//! neighbors read as empty, so faces on the chunk boundary are always
//! emitted. Cross-chunk occlusion at shared boundaries is deliberately not
//! consulted; mesh validity would otherwise depend on neighbor load order.
//!
//! ## Dirty tracking
//!
//! Every voxel write sets `dirty`; `build_mesh` clears it and bumps the
//! mesh `revision`. The revision is how the render backend detects that its
//! uploaded GPU buffers are stale and must be reallocated.

use cgmath::Point3;

use super::block::{self, block_side::BlockSide, BlockId, AIR};
use super::mesh::ChunkMesh;

/// A fixed-size cubic region of voxel blocks in the world.
///
/// Chunks are created empty, populated by the terrain generator (or by
/// direct edits), meshed, mutated and re-meshed, and eventually dropped,
/// releasing the voxel grid and mesh. GPU-side buffers keyed to the chunk
/// are reclaimed by the render backend's buffer sweep.
pub struct Chunk {
    /// The position of this chunk in chunk coordinates (not block coordinates).
    pub position: Point3<i32>,
    /// Edge length of the voxel grid.
    size: usize,
    /// Dense block-code storage, `size³` entries, row-major (x, then y, then z).
    voxels: Vec<BlockId>,
    /// The mesh built from the current voxel data, if any.
    mesh: Option<ChunkMesh>,
    /// Whether voxel data changed since the last mesh build.
    dirty: bool,
    /// Whether no non-air voxel is present. An optimization hint only;
    /// the renderer must not rely on it for correctness.
    empty: bool,
    /// Incremented on every mesh rebuild.
    revision: u64,
}

impl Chunk {
    /// Creates a new, completely empty chunk (all blocks are air).
    ///
    /// # Arguments
    /// * `position` - The chunk coordinates of the new chunk
    /// * `size` - Edge length of the voxel grid in blocks
    pub fn new(position: Point3<i32>, size: usize) -> Self {
        Chunk {
            position,
            size,
            voxels: vec![AIR; size * size * size],
            mesh: None,
            dirty: true,
            empty: true,
            revision: 0,
        }
    }

    /// Edge length of the voxel grid.
    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size * (y + self.size * z)
    }

    fn in_range(&self, x: i32, y: i32, z: i32) -> bool {
        let limit = self.size as i32;
        (0..limit).contains(&x) && (0..limit).contains(&y) && (0..limit).contains(&z)
    }

    /// Gets the block code at the specified chunk-local coordinates.
    ///
    /// Out-of-range coordinates return [`AIR`] rather than an error. This is
    /// what lets face-visibility checks at chunk edges treat cells outside
    /// the local grid as exposed air.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        if self.in_range(x, y, z) {
            self.voxels[self.index(x as usize, y as usize, z as usize)]
        } else {
            AIR
        }
    }

    /// Writes the block code at the specified chunk-local coordinates and
    /// marks the chunk dirty.
    ///
    /// Out-of-range coordinates are a no-op; the grid and the dirty flag are
    /// left untouched.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        if !self.in_range(x, y, z) {
            return;
        }
        let index = self.index(x as usize, y as usize, z as usize);
        self.voxels[index] = id;
        self.dirty = true;
        if id != AIR {
            self.empty = false;
        }
    }

    /// Whether the voxel data changed since the last mesh build.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the chunk's mesh as stale so the next `build_mesh` rebuilds it.
    ///
    /// Used by the world when an edit in a *neighboring* chunk lands on the
    /// shared boundary and this chunk's boundary faces may have changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether no non-air voxel is present (optimization hint).
    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// The mesh built from the current voxel data, if one exists.
    pub fn mesh(&self) -> Option<&ChunkMesh> {
        self.mesh.as_ref()
    }

    /// The rebuild counter for the current mesh.
    ///
    /// The render backend records this at upload time and reallocates the
    /// chunk's GPU buffers whenever it changes, so a stale buffer is never
    /// drawn with mismatched vertex/index counts.
    pub fn mesh_revision(&self) -> u64 {
        self.revision
    }

    /// Rebuilds the mesh from the voxel grid if the chunk is dirty.
    ///
    /// For every non-empty voxel, emits one quad per face whose neighboring
    /// cell (in local space) is empty. The previous mesh is discarded
    /// wholesale. Clears `dirty`, refreshes the `empty` hint and bumps the
    /// mesh revision.
    pub fn build_mesh(&mut self) {
        if !self.dirty {
            return;
        }

        let mut mesh = ChunkMesh::new();
        let mut any_solid = false;
        let limit = self.size as i32;

        for z in 0..limit {
            for y in 0..limit {
                for x in 0..limit {
                    let id = self.voxels[self.index(x as usize, y as usize, z as usize)];
                    if !block::is_solid(id) {
                        continue;
                    }
                    any_solid = true;
                    let tile = block::properties_of(id).tile;
                    for side in BlockSide::all() {
                        let [dx, dy, dz] = side.offset();
                        if !block::is_solid(self.block_at(x + dx, y + dy, z + dz)) {
                            mesh.push_face(x as usize, y as usize, z as usize, side, tile);
                        }
                    }
                }
            }
        }

        self.empty = !any_solid;
        self.mesh = Some(mesh);
        self.dirty = false;
        self.revision += 1;
    }

    /// World-space center of this chunk, used for near-to-far draw ordering.
    pub fn center(&self) -> Point3<f32> {
        let size = self.size as f32;
        let half = size * 0.5;
        Point3::new(
            self.position.x as f32 * size + half,
            self.position.y as f32 * size + half,
            self.position.z as f32 * size + half,
        )
    }

    /// World-space minimum corner of this chunk.
    pub fn world_min(&self) -> Point3<f32> {
        let size = self.size as f32;
        Point3::new(
            self.position.x as f32 * size,
            self.position.y as f32 * size,
            self.position.z as f32 * size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn test_chunk() -> Chunk {
        Chunk::new(Point3::new(0, 0, 0), 8)
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut chunk = test_chunk();
        for (i, block_type) in BlockType::all().into_iter().enumerate() {
            let coordinate = i as i32;
            chunk.set_block_at(coordinate, 0, coordinate, block_type.id());
            assert_eq!(chunk.block_at(coordinate, 0, coordinate), block_type.id());
        }
    }

    #[test]
    fn out_of_range_get_returns_air() {
        let chunk = test_chunk();
        assert_eq!(chunk.block_at(-1, 0, 0), AIR);
        assert_eq!(chunk.block_at(0, 8, 0), AIR);
        assert_eq!(chunk.block_at(0, 0, 100), AIR);
    }

    #[test]
    fn out_of_range_set_is_a_no_op() {
        let mut chunk = test_chunk();
        chunk.build_mesh();
        assert!(!chunk.is_dirty());

        chunk.set_block_at(-1, 0, 0, BlockType::STONE.id());
        chunk.set_block_at(0, -1, 0, BlockType::STONE.id());
        chunk.set_block_at(8, 0, 8, BlockType::STONE.id());

        // Grid unchanged and no dirty transition.
        assert!(!chunk.is_dirty());
        assert!(chunk.is_empty());
    }

    #[test]
    fn isolated_cube_emits_six_faces() {
        let mut chunk = test_chunk();
        chunk.set_block_at(3, 3, 3, BlockType::STONE.id());
        chunk.build_mesh();
        let mesh = chunk.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn boundary_cube_still_emits_six_faces() {
        // Out-of-range neighbors read as air, so a corner voxel is fully exposed.
        let mut chunk = test_chunk();
        chunk.set_block_at(0, 0, 0, BlockType::STONE.id());
        chunk.build_mesh();
        let mesh = chunk.mesh().unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.index_count(), 36);
    }

    #[test]
    fn adjacent_cubes_occlude_their_shared_faces() {
        let mut chunk = test_chunk();
        chunk.set_block_at(3, 3, 3, BlockType::STONE.id());
        chunk.set_block_at(4, 3, 3, BlockType::STONE.id());
        chunk.build_mesh();
        let mesh = chunk.mesh().unwrap();
        // 6 + 6 - 2 occluded = 10 faces.
        assert_eq!(mesh.vertex_count(), 40);
        assert_eq!(mesh.index_count(), 60);
    }

    #[test]
    fn build_mesh_is_a_no_op_when_clean() {
        let mut chunk = test_chunk();
        chunk.set_block_at(1, 1, 1, BlockType::SOIL.id());
        chunk.build_mesh();
        let revision = chunk.mesh_revision();

        chunk.build_mesh();
        assert_eq!(chunk.mesh_revision(), revision);
    }

    #[test]
    fn edits_mark_dirty_and_rebuild_bumps_revision() {
        let mut chunk = test_chunk();
        chunk.set_block_at(1, 1, 1, BlockType::SOIL.id());
        chunk.build_mesh();
        assert!(!chunk.is_dirty());

        chunk.set_block_at(1, 2, 1, BlockType::SOIL.id());
        assert!(chunk.is_dirty());
        let revision = chunk.mesh_revision();
        chunk.build_mesh();
        assert_eq!(chunk.mesh_revision(), revision + 1);
    }

    #[test]
    fn empty_hint_recovers_after_clearing_blocks() {
        let mut chunk = test_chunk();
        chunk.set_block_at(2, 2, 2, BlockType::GRASS.id());
        chunk.build_mesh();
        assert!(!chunk.is_empty());

        chunk.set_block_at(2, 2, 2, AIR);
        chunk.build_mesh();
        assert!(chunk.is_empty());
        assert!(chunk.mesh().unwrap().is_empty());
    }
}
