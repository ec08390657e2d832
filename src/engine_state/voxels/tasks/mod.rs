//! # Chunk Load Tasks
//!
//! This module models chunk population and meshing as explicit task objects.
//! Generation plus meshing is long-running relative to a frame, so a load
//! request is not serviced where it is issued: the world enqueues a
//! [`ChunkLoadTask`] and completes at most `max_chunks_per_frame` of them per
//! streaming tick, on the single control thread. A request made on one tick
//! may therefore complete ticks later.
//!
//! ## Lifecycle
//! 1. The selection pass enqueues a task per missing coordinate (deduplicated).
//! 2. The tick's load budget pops tasks and calls [`ChunkLoadTask::process`].
//! 3. The finished chunk is admitted into the chunk mapping and active set.
//!
//! There is no cancellation: once enqueued, a task completes even if the
//! observer has moved away, and the resulting chunk simply becomes an unload
//! candidate on the next selection pass. Wasted work, but no partial state.

pub mod chunk_load_task;

pub use chunk_load_task::ChunkLoadTask;
