//! Frustum culling for view-dependent chunk selection.
//!
//! Extracts the six frustum planes from a view-projection matrix and tests
//! axis-aligned bounding boxes against them. The test is conservative: a box
//! is reported inside if no plane fully separates it, which may rarely accept
//! a box outside a frustum corner but never rejects a visible one.

use cgmath::{Matrix4, Point3};

/// A plane in 3D space (ax + by + cz + d = 0), normal pointing inward.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
}

impl Plane {
    fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    fn normalized(self) -> Self {
        let length = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if length > 0.0 {
            Self {
                a: self.a / length,
                b: self.b / length,
                c: self.c / length,
                d: self.d / length,
            }
        } else {
            self
        }
    }

    /// Signed distance from a point to the plane; negative is outside.
    fn distance_to_point(&self, point: Point3<f32>) -> f32 {
        self.a * point.x + self.b * point.y + self.c * point.z + self.d
    }
}

/// An axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f32>,
    /// Maximum corner.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Creates a box from its minimum corner and edge length.
    pub fn cube(min: Point3<f32>, edge: f32) -> Self {
        Aabb {
            min,
            max: Point3::new(min.x + edge, min.y + edge, min.z + edge),
        }
    }

    /// The corner of the box farthest along the given plane normal.
    fn positive_vertex(&self, plane: &Plane) -> Point3<f32> {
        Point3::new(
            if plane.a >= 0.0 { self.max.x } else { self.min.x },
            if plane.b >= 0.0 { self.max.y } else { self.min.y },
            if plane.c >= 0.0 { self.max.z } else { self.min.z },
        )
    }
}

/// The view frustum: left, right, bottom, top, near, far planes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Frustum {
    planes: [Plane; 6],
}

impl Frustum {
    /// Extracts frustum planes from a view-projection matrix
    /// (column-major, the cgmath/WGPU convention).
    pub fn from_view_projection(matrix: &Matrix4<f32>) -> Self {
        let m: &[[f32; 4]; 4] = matrix.as_ref();
        let planes = [
            // Left: row3 + row0
            Plane::new(
                m[0][3] + m[0][0],
                m[1][3] + m[1][0],
                m[2][3] + m[2][0],
                m[3][3] + m[3][0],
            ),
            // Right: row3 - row0
            Plane::new(
                m[0][3] - m[0][0],
                m[1][3] - m[1][0],
                m[2][3] - m[2][0],
                m[3][3] - m[3][0],
            ),
            // Bottom: row3 + row1
            Plane::new(
                m[0][3] + m[0][1],
                m[1][3] + m[1][1],
                m[2][3] + m[2][1],
                m[3][3] + m[3][1],
            ),
            // Top: row3 - row1
            Plane::new(
                m[0][3] - m[0][1],
                m[1][3] - m[1][1],
                m[2][3] - m[2][1],
                m[3][3] - m[3][1],
            ),
            // Near: row3 + row2
            Plane::new(
                m[0][3] + m[0][2],
                m[1][3] + m[1][2],
                m[2][3] + m[2][2],
                m[3][3] + m[3][2],
            ),
            // Far: row3 - row2
            Plane::new(
                m[0][3] - m[0][2],
                m[1][3] - m[1][2],
                m[2][3] - m[2][2],
                m[3][3] - m[3][2],
            ),
        ];
        Self {
            planes: planes.map(Plane::normalized),
        }
    }

    /// Tests whether any part of the box may be inside the frustum.
    pub fn contains_aabb(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            if plane.distance_to_point(aabb.positive_vertex(plane)) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{perspective, Deg, Matrix4, Vector3};

    use super::*;

    fn looking_down_negative_z() -> Frustum {
        let projection = perspective(Deg(70.0), 16.0 / 9.0, 0.1, 500.0);
        let view = Matrix4::look_to_rh(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
        );
        Frustum::from_view_projection(&(projection * view))
    }

    #[test]
    fn box_in_front_is_inside() {
        let frustum = looking_down_negative_z();
        let aabb = Aabb::cube(Point3::new(-8.0, -8.0, -40.0), 16.0);
        assert!(frustum.contains_aabb(&aabb));
    }

    #[test]
    fn box_behind_is_outside() {
        let frustum = looking_down_negative_z();
        let aabb = Aabb::cube(Point3::new(-8.0, -8.0, 40.0), 16.0);
        assert!(!frustum.contains_aabb(&aabb));
    }

    #[test]
    fn box_beyond_far_plane_is_outside() {
        let frustum = looking_down_negative_z();
        let aabb = Aabb::cube(Point3::new(-8.0, -8.0, -2000.0), 16.0);
        assert!(!frustum.contains_aabb(&aabb));
    }

    #[test]
    fn box_straddling_a_plane_is_inside() {
        let frustum = looking_down_negative_z();
        // Straddles the near plane / camera origin.
        let aabb = Aabb::cube(Point3::new(-8.0, -8.0, -8.0), 16.0);
        assert!(frustum.contains_aabb(&aabb));
    }
}
