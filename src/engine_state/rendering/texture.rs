//! Texture handling for the rendering pipeline.
//!
//! This module provides depth-texture creation and the block texture atlas.
//! A missing or unreadable atlas file is recovered locally: a procedurally
//! generated placeholder atlas is substituted and rendering continues.

use log::{info, warn};

use crate::engine_state::voxels::mesh::ATLAS_GRID_SIZE;

/// Pixel edge length of one atlas tile in the placeholder atlas.
const PLACEHOLDER_TILE_SIZE: u32 = 16;

/// Flat per-tile base colors for the placeholder atlas, one per block kind
/// in atlas-tile order (grass, soil, stone, bedrock).
const PLACEHOLDER_TILE_COLORS: [[u8; 3]; 4] = [
    [96, 160, 64],   // grass
    [134, 96, 67],   // soil
    [128, 128, 132], // stone
    [48, 48, 52],    // bedrock
];

/// A GPU texture with its view and sampler.
pub struct Texture {
    /// The underlying texture resource.
    #[allow(dead_code)]
    pub texture: wgpu::Texture,
    /// The texture view used for binding to the pipeline.
    pub view: wgpu::TextureView,
    /// The sampler used for filtering and addressing.
    pub sampler: wgpu::Sampler,
}

impl Texture {
    /// The texture format used for depth buffers.
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a new depth texture matching the surface configuration.
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Loads the block texture atlas from `path`, falling back to a
    /// generated placeholder when the file is missing or undecodable.
    pub fn create_block_atlas(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &str,
    ) -> Self {
        let (pixels, width, height) = match image::open(path) {
            Ok(decoded) => {
                let rgba = decoded.to_rgba8();
                let (width, height) = rgba.dimensions();
                info!("Loaded block atlas from {} ({}x{})", path, width, height);
                (rgba.into_raw(), width, height)
            }
            Err(e) => {
                warn!(
                    "Block atlas unavailable at {} ({}); using placeholder atlas",
                    path, e
                );
                Self::placeholder_atlas_pixels()
            }
        };

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("block atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Generates RGBA pixels for the placeholder atlas: one flat-colored
    /// tile per block kind with a subtle checker so orientation is visible.
    fn placeholder_atlas_pixels() -> (Vec<u8>, u32, u32) {
        let edge = ATLAS_GRID_SIZE * PLACEHOLDER_TILE_SIZE;
        let mut pixels = vec![0u8; (edge * edge * 4) as usize];
        for y in 0..edge {
            for x in 0..edge {
                let tile_x = x / PLACEHOLDER_TILE_SIZE;
                let tile_y = y / PLACEHOLDER_TILE_SIZE;
                let tile_index = (tile_y * ATLAS_GRID_SIZE + tile_x) as usize;
                let base = PLACEHOLDER_TILE_COLORS
                    .get(tile_index)
                    .copied()
                    .unwrap_or([255, 0, 255]);
                let checker = if (x / 2 + y / 2) % 2 == 0 { 0 } else { 12 };
                let offset = ((y * edge + x) * 4) as usize;
                pixels[offset] = base[0].saturating_sub(checker);
                pixels[offset + 1] = base[1].saturating_sub(checker);
                pixels[offset + 2] = base[2].saturating_sub(checker);
                pixels[offset + 3] = 255;
            }
        }
        (pixels, edge, edge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_atlas_is_square_and_opaque() {
        let (pixels, width, height) = Texture::placeholder_atlas_pixels();
        assert_eq!(width, height);
        assert_eq!(pixels.len(), (width * height * 4) as usize);
        for alpha in pixels.chunks(4).map(|p| p[3]) {
            assert_eq!(alpha, 255);
        }
    }
}
