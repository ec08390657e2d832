//! # Rendering Module
//!
//! The GPU-backed render backend. It owns every GPU-side resource: the
//! compiled shader, the render pipeline, the shared uniform buffer, the
//! block atlas and depth textures, the dynamic per-chunk model-matrix
//! buffer, and the per-chunk vertex/index buffers keyed by chunk coordinate.
//!
//! ## Resource lifetime contract
//!
//! A chunk's GPU buffers are created lazily the first time it is drawn.
//! They are destroyed in exactly two cases, both handled here:
//! - the chunk re-meshed: its mesh revision no longer matches the uploaded
//!   one, so the stale pair is destroyed and fresh buffers are allocated
//!   (always reallocate, never resize in place);
//! - the chunk left the world mapping: a per-frame sweep destroys the
//!   orphaned pair.
//!
//! The backend reads streamer state through `World`'s accessors but never
//! mutates it, and all uploads happen on the control thread that owns the
//! graphics context.

use std::collections::HashMap;
use std::time::Instant;

use cgmath::{Matrix4, Point3, Vector3};
use log::{error, warn};

use crate::config::EngineConfig;
use crate::error::RenderInitError;
use crate::engine_state::camera_state::{Camera, CameraView, Projection};
use crate::engine_state::voxels::world::World;

mod chunk_buffers;
mod texture;
mod vertex;

use chunk_buffers::ChunkGpuBuffers;
use texture::Texture;

pub use vertex::Vertex;

/// Path the block atlas is loaded from; a placeholder is generated when the
/// file is missing.
const ATLAS_PATH: &str = "assets/textures/atlas.png";

/// Byte stride between per-chunk model matrices in the dynamic uniform
/// buffer. 256 satisfies `min_uniform_buffer_offset_alignment` on all
/// supported backends.
const MODEL_UNIFORM_STRIDE: u64 = 256;

/// Initial number of model-matrix slots; grows on demand.
const INITIAL_MODEL_CAPACITY: u32 = 512;

/// Direction the sun shines from, normalized in the shader.
const LIGHT_DIRECTION: [f32; 4] = [0.4, 1.0, 0.6, 0.0];

/// Ambient light level added to the directional term.
const AMBIENT_LEVEL: f32 = 0.35;

/// Per-frame draw statistics accumulated by [`RenderBackend::render_world`].
#[derive(Debug, Default, Copy, Clone)]
pub struct RenderStats {
    /// Number of indexed draw calls issued.
    pub draw_calls: u32,
    /// Total vertices across all drawn chunks.
    pub vertices: u32,
    /// Total triangles across all drawn chunks.
    pub triangles: u32,
    /// Number of chunks drawn.
    pub chunks: u32,
}

/// Shared per-frame uniforms, bound once for all chunks.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GlobalUniforms {
    projection: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_direction: [f32; 4],
    /// x = fog near, y = fog far, z = ambient level, w = elapsed seconds.
    fog_params: [f32; 4],
}

/// Per-chunk model matrix, padded out to the dynamic-offset stride.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniform {
    model: [[f32; 4]; 4],
}

/// The GPU-backed rendering backend.
pub struct RenderBackend {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_capacity: u32,
    depth_texture: Texture,
    projection: Projection,
    chunk_buffers: HashMap<Point3<i32>, ChunkGpuBuffers>,
    config: EngineConfig,
    started: Instant,
}

impl RenderBackend {
    /// Creates the backend, compiling the chunk shader and allocating every
    /// shared GPU resource.
    ///
    /// Initialization is the one place rendering failures are fatal: a
    /// shader that fails validation or a device that cannot be configured
    /// aborts startup with a diagnosable error instead of rendering a
    /// corrupt frame.
    pub fn new(
        surface: wgpu::Surface<'static>,
        surface_config: wgpu::SurfaceConfiguration,
        device: wgpu::Device,
        queue: wgpu::Queue,
        shader_source: &str,
        config: &EngineConfig,
    ) -> Result<Self, RenderInitError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("chunk shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        if let Some(e) = pollster::block_on(device.pop_error_scope()) {
            return Err(RenderInitError::ShaderCompile(e.to_string()));
        }

        let atlas = Texture::create_block_atlas(&device, &queue, ATLAS_PATH);
        let depth_texture = Texture::create_depth_texture(&device, &surface_config, "depth texture");

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global uniforms"),
            size: std::mem::size_of::<GlobalUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let globals_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("globals bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals bind group"),
            layout: &globals_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&atlas.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&atlas.sampler),
                },
            ],
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("model bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });
        let (model_buffer, model_bind_group) = Self::create_model_buffer(
            &device,
            &model_bind_group_layout,
            INITIAL_MODEL_CAPACITY,
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("chunk pipeline layout"),
            bind_group_layouts: &[&globals_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("chunk pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: Texture::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let projection = Self::build_projection(
            surface_config.width,
            surface_config.height,
            config,
        );

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline,
            globals_buffer,
            globals_bind_group,
            model_buffer,
            model_bind_group,
            model_bind_group_layout,
            model_capacity: INITIAL_MODEL_CAPACITY,
            depth_texture,
            projection,
            chunk_buffers: HashMap::new(),
            config: config.clone(),
            started: Instant::now(),
        })
    }

    fn build_projection(width: u32, height: u32, config: &EngineConfig) -> Projection {
        Projection::new(
            width.max(1),
            height.max(1),
            cgmath::Deg(config.field_of_view_deg),
            0.1,
            Self::view_range(config),
        )
    }

    /// Far-plane distance: one chunk beyond the streaming radius, so chunks
    /// pop in behind the fog rather than at the clip plane.
    fn view_range(config: &EngineConfig) -> f32 {
        ((config.render_distance + 1) * config.chunk_size) as f32
    }

    fn create_model_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u32,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("chunk model matrices"),
            size: capacity as u64 * MODEL_UNIFORM_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("model bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Ensures the model-matrix buffer can hold `required` chunks.
    fn ensure_model_capacity(&mut self, required: u32) {
        if required <= self.model_capacity {
            return;
        }
        let capacity = required.next_power_of_two();
        let (buffer, bind_group) =
            Self::create_model_buffer(&self.device, &self.model_bind_group_layout, capacity);
        self.model_buffer.destroy();
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
    }

    /// Renders one frame of the world from the camera's point of view.
    ///
    /// Walks the camera-filtered, near-to-far-sorted visible chunk list,
    /// uploading or refreshing GPU buffers as needed and issuing one indexed
    /// draw call per chunk with a non-empty mesh. Returns the accumulated
    /// draw statistics; a frame skipped due to a surface hiccup returns
    /// zeroed statistics.
    pub fn render_world(&mut self, world: &World, camera: &Camera) -> RenderStats {
        let mut stats = RenderStats::default();

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost; reconfiguring");
                self.surface.configure(&self.device, &self.surface_config);
                return stats;
            }
            Err(e) => {
                error!("Skipping frame: {:?}", e);
                return stats;
            }
        };

        // Shared uniforms for this frame.
        let view_matrix = camera.calc_matrix();
        let fog_far = Self::view_range(&self.config);
        let globals = GlobalUniforms {
            projection: self.projection.calc_matrix().into(),
            view: view_matrix.into(),
            camera_position: [camera.position.x, camera.position.y, camera.position.z, 1.0],
            light_direction: LIGHT_DIRECTION,
            fog_params: [
                fog_far * 0.7,
                fog_far,
                AMBIENT_LEVEL,
                self.started.elapsed().as_secs_f32(),
            ],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // Buffers whose chunk left the world are destroyed before new work
        // is uploaded.
        self.chunk_buffers.retain(|coordinate, buffers| {
            if world.contains_chunk(coordinate) {
                true
            } else {
                buffers.destroy();
                false
            }
        });

        let camera_view = CameraView::new(camera, &self.projection);
        let visible = world.visible_chunks(&camera_view);
        self.ensure_model_capacity(visible.len() as u32);

        // Upload pass: refresh stale buffers and write model matrices.
        let chunk_edge = self.config.chunk_size as f32;
        let mut draw_list: Vec<(Point3<i32>, u32)> = Vec::with_capacity(visible.len());
        for chunk in visible {
            let Some(mesh) = chunk.mesh() else { continue };
            if chunk.is_empty() || mesh.is_empty() {
                // A chunk re-meshed down to nothing keeps no buffers behind.
                if let Some(old) = self.chunk_buffers.remove(&chunk.position) {
                    old.destroy();
                }
                continue;
            }

            let stale = self
                .chunk_buffers
                .get(&chunk.position)
                .is_none_or(|buffers| buffers.revision != chunk.mesh_revision());
            if stale {
                if let Some(old) = self.chunk_buffers.remove(&chunk.position) {
                    old.destroy();
                }
                self.chunk_buffers.insert(
                    chunk.position,
                    ChunkGpuBuffers::upload(&self.device, mesh, chunk.mesh_revision()),
                );
            }

            let slot = draw_list.len() as u32;
            let translation = Vector3::new(
                chunk.position.x as f32 * chunk_edge,
                chunk.position.y as f32 * chunk_edge,
                chunk.position.z as f32 * chunk_edge,
            );
            let model = ModelUniform {
                model: Matrix4::from_translation(translation).into(),
            };
            self.queue.write_buffer(
                &self.model_buffer,
                slot as u64 * MODEL_UNIFORM_STRIDE,
                bytemuck::bytes_of(&model),
            );
            draw_list.push((chunk.position, slot));
        }

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("chunk render encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("chunk render pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.35,
                            g: 0.58,
                            b: 0.82,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (coordinate, slot) in &draw_list {
                let Some(buffers) = self.chunk_buffers.get(coordinate) else {
                    continue;
                };
                let offset = (*slot as u64 * MODEL_UNIFORM_STRIDE) as u32;
                render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, buffers.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(buffers.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..buffers.index_count, 0, 0..1);

                stats.draw_calls += 1;
                stats.vertices += buffers.vertex_count;
                stats.triangles += buffers.index_count / 3;
                stats.chunks += 1;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        stats
    }

    /// Handles a viewport resize: reconfigures the surface, recomputes the
    /// projection's aspect ratio and rebuilds the depth texture. Per-chunk
    /// buffers are untouched.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.projection.resize(width, height);
        self.depth_texture =
            Texture::create_depth_texture(&self.device, &self.surface_config, "depth texture");
    }

    /// Applies a changed configuration: recomputes the projection from the
    /// new field of view and view range. Per-chunk buffers are untouched.
    pub fn update_config(&mut self, config: &EngineConfig) {
        self.config = config.clone();
        self.projection = Self::build_projection(
            self.surface_config.width,
            self.surface_config.height,
            config,
        );
    }
}
