//! # Block Side Module
//!
//! This module defines the six faces of a voxel block together with the
//! geometry tables the mesh builder consumes: neighbor offsets for the
//! occlusion test, outward normals, and the four quad corners of each face.

/// Represents the six axis-aligned faces of a voxel block.
///
/// Each variant carries a stable integer value used to index the geometry
/// tables below. The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT].
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The front face (facing positive Z).
    FRONT = 0,

    /// The back face (facing negative Z).
    BACK = 1,

    /// The bottom face (facing negative Y).
    BOTTOM = 2,

    /// The top face (facing positive Y).
    TOP = 3,

    /// The left face (facing negative X).
    LEFT = 4,

    /// The right face (facing positive X).
    RIGHT = 5,
}

/// The local-grid offset of the neighbor cell occluding each face, indexed
/// by `BlockSide as usize`.
const SIDE_OFFSETS: [[i32; 3]; 6] = [
    [0, 0, 1],  // FRONT
    [0, 0, -1], // BACK
    [0, -1, 0], // BOTTOM
    [0, 1, 0],  // TOP
    [-1, 0, 0], // LEFT
    [1, 0, 0],  // RIGHT
];

/// The outward-facing unit normal of each face, indexed by `BlockSide as usize`.
const SIDE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [0.0, -1.0, 0.0],
    [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
];

/// The four corners of each face quad, relative to the voxel's minimum
/// corner, indexed by `BlockSide as usize`.
///
/// Corners are listed counter-clockwise when viewed from outside the block,
/// so the uniform triangle-list pattern (0,1,2) / (0,2,3) yields front faces
/// with the outward normal for every side.
const SIDE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // FRONT (+Z)
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // BACK (-Z)
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    // BOTTOM (-Y)
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // TOP (+Y)
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    // LEFT (-X)
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // RIGHT (+X)
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
];

/// The fixed four-corner texture coordinate set shared by every face,
/// matching the corner order of [`BlockSide::corners`]. V grows downward in
/// texture space, so corner 0 (a lower quad corner) maps to v = 1.
pub const FACE_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT].
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The local-grid offset of the cell whose emptiness exposes this face.
    pub fn offset(self) -> [i32; 3] {
        SIDE_OFFSETS[self as usize]
    }

    /// The outward-facing unit normal of this face.
    pub fn normal(self) -> [f32; 3] {
        SIDE_NORMALS[self as usize]
    }

    /// The four quad corners of this face, counter-clockwise from outside.
    pub fn corners(self) -> &'static [[f32; 3]; 4] {
        &SIDE_CORNERS[self as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn corner_winding_matches_outward_normal() {
        for side in BlockSide::all() {
            let c = side.corners();
            let e1 = [c[1][0] - c[0][0], c[1][1] - c[0][1], c[1][2] - c[0][2]];
            let e2 = [c[2][0] - c[0][0], c[2][1] - c[0][1], c[2][2] - c[0][2]];
            let n = cross(e1, e2);
            let expected = side.normal();
            // For these unit quads the edge cross product IS the face
            // normal, so the match can be exact.
            assert_eq!(n, expected, "winding of {:?} does not face its normal", side);
        }
    }

    #[test]
    fn offsets_oppose_in_pairs() {
        let front = BlockSide::FRONT.offset();
        let back = BlockSide::BACK.offset();
        for axis in 0..3 {
            assert_eq!(front[axis], -back[axis]);
        }
        let top = BlockSide::TOP.offset();
        let bottom = BlockSide::BOTTOM.offset();
        for axis in 0..3 {
            assert_eq!(top[axis], -bottom[axis]);
        }
    }
}
