//! # World Module
//!
//! This module provides the `World` struct: the streamer that owns every
//! loaded chunk and decides, relative to the observer, which chunk
//! coordinates must be loaded, kept or unloaded.
//!
//! ## Architecture
//!
//! The world is a sparse chunk mapping plus three pieces of bookkeeping:
//! an *active set* (the chunks eligible for update and render), a
//! deduplicated *load queue* of pending [`ChunkLoadTask`]s, and an *unload
//! queue* of chunks marked for teardown. Per chunk coordinate the lifecycle
//! is:
//!
//! ```text
//! Unloaded -> Queued(load) -> Loaded -> Active -> Queued(unload) -> Unloaded
//! ```
//!
//! A coordinate is re-queued for load only when it is neither loaded nor
//! already queued. Entering the unload queue removes the coordinate from the
//! active set in the same step, so a chunk is never simultaneously active
//! and pending teardown when the render path runs.
//!
//! ## Backpressure
//!
//! The selection pass is throttled by `chunk_update_interval_ms`, and each
//! streaming tick processes at most `max_chunks_per_frame` loads and,
//! independently, at most that many unloads. These caps are the system's
//! only throttle: a sudden observer jump can make hundreds of coordinates
//! eligible at once, and the queues absorb the burst across subsequent
//! ticks instead of stalling a single frame.
//!
//! ## Invariants
//!
//! - At most one chunk per coordinate, enforced at insertion.
//! - The active set is a subset of the chunk mapping.
//! - Removal from the mapping is preceded by removal from the active set.
//! - Only the world mutates the mapping, the active set or the queues, and
//!   only from the control thread; the render backend reads the visible set
//!   but never writes streamer state.

use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use cgmath::{MetricSpace, Point3, Vector3};
use log::debug;

use crate::config::EngineConfig;
use crate::engine_state::camera_state::{Aabb, CameraView};

use super::block::{BlockId, AIR};
use super::chunk::Chunk;
use super::tasks::ChunkLoadTask;
use super::terrain::TerrainGenerator;

/// Face-adjacent neighbor offsets paired with the boundary they share.
const NEIGHBOR_OFFSETS: [Vector3<i32>; 6] = [
    Vector3::new(-1, 0, 0),
    Vector3::new(1, 0, 0),
    Vector3::new(0, -1, 0),
    Vector3::new(0, 1, 0),
    Vector3::new(0, 0, -1),
    Vector3::new(0, 0, 1),
];

/// The voxel world: a streamed set of chunks around the observer.
pub struct World {
    config: EngineConfig,
    terrain: TerrainGenerator,
    /// The chunk mapping. At most one chunk per coordinate.
    chunks: HashMap<Point3<i32>, Chunk>,
    /// Coordinates eligible for update and render. Subset of `chunks`.
    active: HashSet<Point3<i32>>,
    /// Pending load work, in request order.
    load_queue: VecDeque<ChunkLoadTask>,
    /// Coordinates currently sitting in `load_queue`, for deduplication.
    queued_loads: HashSet<Point3<i32>>,
    /// Chunks marked for teardown, in request order.
    unload_queue: VecDeque<Point3<i32>>,
    /// Time since the last selection pass.
    selection_timer: Duration,
}

impl World {
    /// Creates a new world with no chunks loaded.
    pub fn new(config: &EngineConfig) -> Self {
        World {
            terrain: TerrainGenerator::new(config),
            config: config.clone(),
            chunks: HashMap::new(),
            active: HashSet::new(),
            load_queue: VecDeque::new(),
            queued_loads: HashSet::new(),
            unload_queue: VecDeque::new(),
            // Fire the first selection pass on the first update tick.
            selection_timer: Duration::from_millis(config.chunk_update_interval_ms),
        }
    }

    /// Drives one streaming tick.
    ///
    /// Runs the chunk selection pass if at least `chunk_update_interval_ms`
    /// elapsed since the previous one, then drains the load and unload
    /// queues under their independent per-tick caps and re-meshes any active
    /// chunk dirtied by edits.
    ///
    /// # Arguments
    /// * `observer` - World-space position of the observer
    /// * `dt` - Time elapsed since the previous tick
    pub fn update(&mut self, observer: Point3<f32>, dt: Duration) {
        self.selection_timer = self.selection_timer.saturating_add(dt);
        let interval = Duration::from_millis(self.config.chunk_update_interval_ms);
        if self.selection_timer >= interval {
            self.selection_timer = Duration::ZERO;
            self.select_chunks(observer);
        }

        self.process_load_queue();
        self.process_unload_queue();
        self.rebuild_dirty_meshes();
    }

    /// The chunk coordinate containing a world-space position.
    pub fn observer_chunk(&self, observer: Point3<f32>) -> Point3<i32> {
        let size = self.config.chunk_size as f32;
        Point3::new(
            (observer.x / size).floor() as i32,
            (observer.y / size).floor() as i32,
            (observer.z / size).floor() as i32,
        )
    }

    /// Decides which coordinates to queue for load and which active chunks
    /// to queue for unload, relative to the observer.
    ///
    /// The radius test is Euclidean in chunk-grid units on the (x, z) plane
    /// only; every vertical layer of the world is considered in range
    /// horizontally.
    fn select_chunks(&mut self, observer: Point3<f32>) {
        let center = self.observer_chunk(observer);
        let radius = self.config.render_distance;

        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                for cy in 0..self.config.world_height_in_chunks {
                    let coordinate = Point3::new(center.x + dx, cy, center.z + dz);
                    if !self.chunks.contains_key(&coordinate)
                        && !self.queued_loads.contains(&coordinate)
                    {
                        self.queued_loads.insert(coordinate);
                        self.load_queue.push_back(ChunkLoadTask::new(coordinate));
                    }
                }
            }
        }

        // Active chunks that drifted out of range leave the active set now
        // and the mapping when their queued unload is processed.
        let out_of_range: Vec<Point3<i32>> = self
            .active
            .iter()
            .filter(|coordinate| {
                let dx = coordinate.x - center.x;
                let dz = coordinate.z - center.z;
                dx * dx + dz * dz > radius * radius
            })
            .copied()
            .collect();
        for coordinate in out_of_range {
            self.active.remove(&coordinate);
            self.unload_queue.push_back(coordinate);
        }

        if !self.load_queue.is_empty() || !self.unload_queue.is_empty() {
            debug!(
                "Chunk selection around {:?}: {} loads and {} unloads pending",
                center,
                self.load_queue.len(),
                self.unload_queue.len()
            );
        }
    }

    /// Completes up to `max_chunks_per_frame` pending load tasks.
    fn process_load_queue(&mut self) {
        for _ in 0..self.config.max_chunks_per_frame {
            let Some(task) = self.load_queue.pop_front() else {
                break;
            };
            let coordinate = task.position();
            self.queued_loads.remove(&coordinate);
            // The coordinate may have been materialized directly since it
            // was queued (e.g. via `load_chunk`); its active/unload state is
            // whatever that path left it in.
            if self.chunks.contains_key(&coordinate) {
                continue;
            }
            let chunk = task.process(&self.terrain, &self.config);
            self.chunks.insert(coordinate, chunk);
            self.active.insert(coordinate);
        }
    }

    /// Tears down up to `max_chunks_per_frame` chunks queued for unload.
    fn process_unload_queue(&mut self) {
        for _ in 0..self.config.max_chunks_per_frame {
            let Some(coordinate) = self.unload_queue.pop_front() else {
                break;
            };
            debug_assert!(
                !self.active.contains(&coordinate),
                "chunk {:?} queued for unload while active",
                coordinate
            );
            if self.chunks.remove(&coordinate).is_some() {
                debug!("Unloaded chunk at {:?}", coordinate);
            }
        }
    }

    /// Rebuilds the mesh of every active chunk dirtied by edits.
    fn rebuild_dirty_meshes(&mut self) {
        let dirty: Vec<Point3<i32>> = self
            .active
            .iter()
            .filter(|coordinate| {
                self.chunks
                    .get(coordinate)
                    .is_some_and(|chunk| chunk.is_dirty())
            })
            .copied()
            .collect();
        for coordinate in dirty {
            if let Some(chunk) = self.chunks.get_mut(&coordinate) {
                chunk.build_mesh();
            }
        }
    }

    /// Loads (or returns) the chunk at a coordinate, immediately and
    /// idempotently.
    ///
    /// Calling this twice for the same coordinate returns the identical
    /// chunk instance; the mapping never holds two entries for one
    /// coordinate. The chunk is admitted to the active set and rescued from
    /// a pending unload, if any.
    pub fn load_chunk(&mut self, coordinate: Point3<i32>) -> &Chunk {
        let terrain = &self.terrain;
        let config = &self.config;
        let chunk = self
            .chunks
            .entry(coordinate)
            .or_insert_with(|| ChunkLoadTask::new(coordinate).process(terrain, config));
        self.active.insert(coordinate);
        self.unload_queue.retain(|queued| *queued != coordinate);
        chunk
    }

    /// Whether a chunk is currently materialized at the coordinate.
    pub fn contains_chunk(&self, coordinate: &Point3<i32>) -> bool {
        self.chunks.contains_key(coordinate)
    }

    /// The chunk at a coordinate, if loaded.
    pub fn chunk_at(&self, coordinate: &Point3<i32>) -> Option<&Chunk> {
        self.chunks.get(coordinate)
    }

    fn split_world_coordinate(&self, x: i32, y: i32, z: i32) -> (Point3<i32>, Point3<i32>) {
        let size = self.config.chunk_size;
        (
            Point3::new(x.div_euclid(size), y.div_euclid(size), z.div_euclid(size)),
            Point3::new(x.rem_euclid(size), y.rem_euclid(size), z.rem_euclid(size)),
        )
    }

    /// The block code at a world-space coordinate.
    ///
    /// Returns [`AIR`] when the owning chunk is not loaded.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        let (coordinate, local) = self.split_world_coordinate(x, y, z);
        self.chunks
            .get(&coordinate)
            .map(|chunk| chunk.block_at(local.x, local.y, local.z))
            .unwrap_or(AIR)
    }

    /// Writes a block code at a world-space coordinate.
    ///
    /// A no-op when the owning chunk is not loaded. When the edited voxel
    /// lies on a chunk boundary face, the loaded neighbor behind that face
    /// is marked dirty as well: its mesh was built from local data only, so
    /// its boundary faces are stale after this edit.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let (coordinate, local) = self.split_world_coordinate(x, y, z);
        let Some(chunk) = self.chunks.get_mut(&coordinate) else {
            return;
        };
        chunk.set_block_at(local.x, local.y, local.z, id);

        let limit = self.config.chunk_size - 1;
        for offset in NEIGHBOR_OFFSETS {
            let shares_boundary = (offset.x == -1 && local.x == 0)
                || (offset.x == 1 && local.x == limit)
                || (offset.y == -1 && local.y == 0)
                || (offset.y == 1 && local.y == limit)
                || (offset.z == -1 && local.z == 0)
                || (offset.z == 1 && local.z == limit);
            if shares_boundary {
                if let Some(neighbor) = self.chunks.get_mut(&(coordinate + offset)) {
                    neighbor.mark_dirty();
                }
            }
        }
    }

    /// Returns the active chunks visible to the camera, sorted by ascending
    /// distance from the camera to each chunk's center.
    ///
    /// Recomputed on every call; the ascending order lets the render backend
    /// draw near-to-far and exploit early depth rejection.
    pub fn visible_chunks(&self, camera: &CameraView) -> Vec<&Chunk> {
        let edge = self.config.chunk_size as f32;
        let mut visible: Vec<&Chunk> = self
            .active
            .iter()
            .filter_map(|coordinate| self.chunks.get(coordinate))
            .filter(|chunk| camera.is_in_frustum(&Aabb::cube(chunk.world_min(), edge)))
            .collect();
        visible.sort_by(|a, b| {
            let da = camera.position.distance2(a.center());
            let db = camera.position.distance2(b.center());
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        visible
    }

    /// Number of chunks in the mapping.
    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks in the active set.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Number of coordinates waiting in the load queue.
    pub fn pending_load_count(&self) -> usize {
        self.load_queue.len()
    }

    /// Number of chunks waiting in the unload queue.
    pub fn pending_unload_count(&self) -> usize {
        self.unload_queue.len()
    }

    /// Iterates over the active chunk coordinates.
    pub fn active_coordinates(&self) -> impl Iterator<Item = &Point3<i32>> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::engine_state::voxels::block::block_type::BlockType;

    use super::*;

    fn test_config() -> EngineConfig {
        EngineConfig {
            chunk_size: 8,
            world_height_in_chunks: 2,
            render_distance: 2,
            max_chunks_per_frame: 1000,
            chunk_update_interval_ms: 0,
            seed: 7,
            ..EngineConfig::default()
        }
    }

    fn tick(world: &mut World, observer: Point3<f32>) {
        world.update(observer, Duration::from_millis(16));
    }

    #[test]
    fn load_chunk_is_idempotent() {
        let mut world = World::new(&test_config());
        let coordinate = Point3::new(1, 0, -1);

        let first = world.load_chunk(coordinate) as *const Chunk;
        let second = world.load_chunk(coordinate) as *const Chunk;
        assert_eq!(first, second, "same coordinate must yield the same chunk");
        assert_eq!(world.loaded_count(), 1);
    }

    #[test]
    fn steady_state_active_set_matches_the_radius_exactly() {
        let config = test_config();
        let mut world = World::new(&config);
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));

        let radius = config.render_distance;
        let mut expected = HashSet::new();
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz > radius * radius {
                    continue;
                }
                for cy in 0..config.world_height_in_chunks {
                    expected.insert(Point3::new(dx, cy, dz));
                }
            }
        }

        let actual: HashSet<Point3<i32>> = world.active_coordinates().copied().collect();
        assert_eq!(actual, expected);
        assert_eq!(world.pending_load_count(), 0);
        assert_eq!(world.pending_unload_count(), 0);
    }

    #[test]
    fn moving_away_unloads_out_of_range_chunks() {
        let config = test_config();
        let mut world = World::new(&config);
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));
        assert!(world.contains_chunk(&Point3::new(0, 0, 0)));

        // Observer jumps far away; old chunks drain from the unload queue.
        let far = Point3::new(1000.0, 0.0, 0.0);
        tick(&mut world, far);
        tick(&mut world, far);

        assert!(!world.contains_chunk(&Point3::new(0, 0, 0)));
        // Unloaded chunks read as air.
        assert_eq!(world.block_at(1, 1, 1), AIR);
    }

    #[test]
    fn per_tick_caps_bound_the_load_burst() {
        let config = EngineConfig {
            max_chunks_per_frame: 2,
            ..test_config()
        };
        let mut world = World::new(&config);
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));

        assert_eq!(world.loaded_count(), 2);
        assert!(world.pending_load_count() > 0);

        // Draining continues on later ticks even with no observer movement.
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(world.loaded_count(), 4);
    }

    #[test]
    fn selection_does_not_duplicate_queued_loads() {
        let config = EngineConfig {
            max_chunks_per_frame: 0,
            ..test_config()
        };
        let mut world = World::new(&config);
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));
        let pending = world.pending_load_count();
        // A second selection pass over the same region queues nothing new.
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(world.pending_load_count(), pending);
    }

    #[test]
    fn active_set_and_unload_queue_are_disjoint() {
        let config = EngineConfig {
            // Cap of zero: queued unloads linger so we can observe them.
            max_chunks_per_frame: 0,
            ..test_config()
        };
        let mut world = World::new(&config);
        world.load_chunk(Point3::new(0, 0, 0));
        tick(&mut world, Point3::new(1000.0, 0.0, 0.0));

        assert!(world.pending_unload_count() > 0);
        assert_eq!(world.active_count(), 0);
    }

    #[test]
    fn world_coordinates_map_to_owning_chunks() {
        let mut world = World::new(&test_config());
        world.load_chunk(Point3::new(-1, 0, -1));

        // World (-1, 0, -1) is local (7, 0, 7) of chunk (-1, 0, -1).
        world.set_block(-1, 0, -1, BlockType::STONE.id());
        assert_eq!(world.block_at(-1, 0, -1), BlockType::STONE.id());
        assert_eq!(
            world
                .chunk_at(&Point3::new(-1, 0, -1))
                .unwrap()
                .block_at(7, 0, 7),
            BlockType::STONE.id()
        );
    }

    #[test]
    fn get_and_set_on_unloaded_chunks_are_absorbed() {
        let mut world = World::new(&test_config());
        assert_eq!(world.block_at(500, 0, 500), AIR);
        world.set_block(500, 0, 500, BlockType::STONE.id());
        assert!(!world.contains_chunk(&Point3::new(62, 0, 62)));
    }

    #[test]
    fn boundary_edits_mark_the_neighbor_dirty() {
        let mut world = World::new(&test_config());
        world.load_chunk(Point3::new(0, 0, 0));
        world.load_chunk(Point3::new(1, 0, 0));
        // Freshly loaded chunks are meshed and clean.
        assert!(!world.chunk_at(&Point3::new(0, 0, 0)).unwrap().is_dirty());

        // Local x = 0 of chunk (1, 0, 0) is world x = 8.
        world.set_block(8, 0, 0, BlockType::STONE.id());
        assert!(world.chunk_at(&Point3::new(0, 0, 0)).unwrap().is_dirty());
        assert!(world.chunk_at(&Point3::new(1, 0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn interior_edits_leave_neighbors_clean() {
        let mut world = World::new(&test_config());
        world.load_chunk(Point3::new(0, 0, 0));
        world.load_chunk(Point3::new(1, 0, 0));

        world.set_block(3, 3, 3, BlockType::STONE.id());
        assert!(world.chunk_at(&Point3::new(0, 0, 0)).unwrap().is_dirty());
        assert!(!world.chunk_at(&Point3::new(1, 0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn dirty_active_chunks_are_remeshed_during_update() {
        let config = test_config();
        let mut world = World::new(&config);
        world.load_chunk(Point3::new(0, 0, 0));
        world.set_block(3, 3, 3, BlockType::STONE.id());
        assert!(world.chunk_at(&Point3::new(0, 0, 0)).unwrap().is_dirty());

        tick(&mut world, Point3::new(0.0, 0.0, 0.0));
        assert!(!world.chunk_at(&Point3::new(0, 0, 0)).unwrap().is_dirty());
    }

    #[test]
    fn visible_chunks_are_sorted_near_to_far() {
        let mut world = World::new(&test_config());
        tick(&mut world, Point3::new(0.0, 0.0, 0.0));

        let camera = CameraView::accept_all(Point3::new(0.0, 0.0, 0.0));
        let visible = world.visible_chunks(&camera);
        assert!(!visible.is_empty());
        let distances: Vec<f32> = visible
            .iter()
            .map(|chunk| camera.position.distance2(chunk.center()))
            .collect();
        for pair in distances.windows(2) {
            assert!(pair[0] <= pair[1], "visible list not sorted by distance");
        }
    }
}
