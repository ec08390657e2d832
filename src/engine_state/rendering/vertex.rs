//! Vertex data structures and layouts for chunk rendering.
//!
//! This module defines the vertex format produced by the chunk mesh builder
//! and consumed by the render pipeline.

/// A vertex in the chunk rendering pipeline.
///
/// Positions are chunk-local; the per-chunk model matrix supplies the world
/// translation at draw time. The layout matches the vertex shader's expected
/// input exactly.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Color: [f32; 4] (16 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position.
    position: [f32; 3],
    /// UV texture coordinates into the block atlas (normalized 0.0-1.0).
    tex_coords: [f32; 2],
    /// Outward-facing unit normal of the emitting face.
    normal: [f32; 3],
    /// Lighting-neutral vertex color, modulated by the fragment shader.
    color: [f32; 4],
}

impl Vertex {
    /// Creates a new vertex with the given attributes.
    pub fn new(position: [f32; 3], tex_coords: [f32; 2], normal: [f32; 3], color: [f32; 4]) -> Self {
        Vertex {
            position,
            tex_coords,
            normal,
            color,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coords (vec2<f32>)
    /// - `location = 2`: normal (vec3<f32>)
    /// - `location = 3`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}
