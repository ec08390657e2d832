//! Per-chunk GPU buffer management.
//!
//! Each drawn chunk owns one vertex buffer and one index buffer on the GPU,
//! created lazily on first draw. The buffers are keyed by chunk coordinate
//! and stamped with the mesh revision they were uploaded from; when the
//! chunk re-meshes, the revision changes and the stale pair is destroyed and
//! reallocated. The recorded index count always belongs to the uploaded
//! revision, so a draw can never pair old buffers with new counts.

use wgpu::util::DeviceExt;

use crate::engine_state::voxels::mesh::ChunkMesh;

/// The GPU-resident geometry of one chunk.
pub struct ChunkGpuBuffers {
    /// Vertex data for the uploaded mesh revision.
    pub vertex_buffer: wgpu::Buffer,
    /// Index data for the uploaded mesh revision.
    pub index_buffer: wgpu::Buffer,
    /// Number of indices in `index_buffer`.
    pub index_count: u32,
    /// Number of vertices in `vertex_buffer`.
    pub vertex_count: u32,
    /// The chunk mesh revision these buffers were uploaded from.
    pub revision: u64,
}

impl ChunkGpuBuffers {
    /// Uploads a mesh, allocating fresh buffers.
    pub fn upload(device: &wgpu::Device, mesh: &ChunkMesh, revision: u64) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("chunk vertex buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("chunk index buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        ChunkGpuBuffers {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            vertex_count: mesh.vertex_count(),
            revision,
        }
    }

    /// Releases the GPU allocations eagerly instead of waiting for the
    /// handles to drop.
    pub fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}
