//! # Block Type Module
//!
//! This module defines the closed set of block kinds in the voxel world.
//! Voxel grids store raw [`BlockId`] codes; this enum gives those codes
//! names and drives the property lookup table.
//!
//! [`BlockId`]: super::BlockId

use num_derive::FromPrimitive;

use super::BlockId;

/// Enumerates all possible block types in the voxel world.
///
/// The discriminants are the on-grid block codes: `AIR` is always `0` and
/// terrain generation assigns the remaining bands. The `FromPrimitive`
/// derive allows conversion back from raw codes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never emitted as geometry, never occludes a face.
    AIR = 0,

    /// The grass surface layer, one block thick at every column top.
    GRASS = 1,

    /// The soil band directly below the surface.
    SOIL = 2,

    /// The stone interior between the soil band and bedrock.
    STONE = 3,

    /// The indestructible floor of the world.
    BEDROCK = 4,
}

impl BlockType {
    /// Converts a raw block code back to a `BlockType`.
    ///
    /// Returns `None` for codes outside the closed set; callers that want
    /// the absorb-silently policy map that to `AIR`.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }

    /// The raw code stored in voxel grids for this block type.
    pub fn id(self) -> BlockId {
        self as BlockId
    }

    /// All variants, in discriminant order.
    pub fn all() -> [BlockType; 5] {
        [
            BlockType::AIR,
            BlockType::GRASS,
            BlockType::SOIL,
            BlockType::STONE,
            BlockType::BEDROCK,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for block_type in BlockType::all() {
            assert_eq!(BlockType::from_id(block_type.id()), Some(block_type));
        }
    }

    #[test]
    fn out_of_range_codes_are_rejected() {
        assert_eq!(BlockType::from_id(5), None);
        assert_eq!(BlockType::from_id(255), None);
    }
}
