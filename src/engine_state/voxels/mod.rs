//! # Voxels Module
//!
//! The voxel side of the engine: block definitions, chunk storage and
//! meshing, procedural terrain generation, load tasks, and the world
//! streamer that ties them together.
//!
//! Data flows in one direction: the observer position drives the world's
//! selection pass, missing coordinates become [`tasks::ChunkLoadTask`]s,
//! each task fills a [`chunk::Chunk`] through the
//! [`terrain::TerrainGenerator`] and builds its [`mesh::ChunkMesh`], and the
//! finished chunk joins the active set the render backend draws from.

pub mod block;
pub mod chunk;
pub mod mesh;
pub mod tasks;
pub mod terrain;
pub mod world;
