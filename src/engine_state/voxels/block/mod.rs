//! # Block Module
//!
//! This module provides the core block-related functionality for the engine.
//! It includes the closed block-type enumeration, the per-face geometry
//! tables, and the static property table driving face culling and texturing.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in voxel
/// storage. Code `0` is always air.
pub type BlockId = u8;

/// The block code for empty space, returned by every out-of-range or
/// unloaded-chunk query.
pub const AIR: BlockId = 0;

/// Static properties of a block kind.
///
/// `tile` addresses the block's texture in the atlas as a (column, row) pair;
/// the mesh builder turns it into concrete texture coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlockProperties {
    /// Whether the block occludes neighboring faces and is emitted itself.
    pub solid: bool,
    /// Atlas tile (column, row) for every face of this block.
    pub tile: [u32; 2],
}

/// Maps each block type to its properties, indexed by `BlockType as usize`.
///
/// The order must match the `BlockType` variant order exactly.
pub static BLOCK_PROPERTIES: [BlockProperties; 5] = [
    BlockProperties { solid: false, tile: [0, 0] }, // AIR
    BlockProperties { solid: true, tile: [0, 0] },  // GRASS
    BlockProperties { solid: true, tile: [1, 0] },  // SOIL
    BlockProperties { solid: true, tile: [2, 0] },  // STONE
    BlockProperties { solid: true, tile: [3, 0] },  // BEDROCK
];

/// Looks up the properties for a raw block code.
///
/// Unknown codes are treated as air, matching the silently-absorbed bounds
/// policy used throughout the voxel layer.
pub fn properties_of(id: BlockId) -> &'static BlockProperties {
    let block_type = BlockType::from_id(id).unwrap_or(BlockType::AIR);
    &BLOCK_PROPERTIES[block_type as usize]
}

/// Convenience check used by the mesh builder's neighbor-occlusion test.
pub fn is_solid(id: BlockId) -> bool {
    properties_of(id).solid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_table_matches_variant_order() {
        for block_type in BlockType::all() {
            let properties = &BLOCK_PROPERTIES[block_type as usize];
            assert_eq!(
                properties.solid,
                block_type != BlockType::AIR,
                "solidity mismatch for {:?}",
                block_type
            );
        }
    }

    #[test]
    fn air_is_code_zero_and_not_solid() {
        assert_eq!(BlockType::AIR as BlockId, AIR);
        assert!(!is_solid(AIR));
        assert!(is_solid(BlockType::STONE as BlockId));
    }

    #[test]
    fn unknown_codes_fall_back_to_air() {
        assert!(!is_solid(250));
        assert_eq!(properties_of(250), &BLOCK_PROPERTIES[0]);
    }
}
