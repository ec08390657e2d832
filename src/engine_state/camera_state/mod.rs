//! # Camera State Module
//!
//! Camera representation, projection math and the frustum/containment test.
//! The streaming layer consumes cameras only through [`CameraView`], an
//! immutable per-frame snapshot of the observer: its position plus the
//! frustum derived from the current view-projection matrix.

pub mod camera;
pub mod frustum;

use cgmath::Point3;

pub use camera::{Camera, CameraController, MovementKey, Projection};
pub use frustum::{Aabb, Frustum};

/// An immutable snapshot of the observer for one visibility query.
///
/// Built once per frame from the live camera and projection; the world uses
/// it to frustum-filter and distance-sort the active chunk set without ever
/// touching mutable camera state.
#[derive(Debug, Clone, Copy)]
pub struct CameraView {
    /// The observer's position in world space.
    pub position: Point3<f32>,
    frustum: Frustum,
}

impl CameraView {
    /// Creates a view snapshot from the camera and projection.
    pub fn new(camera: &Camera, projection: &Projection) -> Self {
        let view_projection = projection.calc_matrix() * camera.calc_matrix();
        CameraView {
            position: camera.position,
            frustum: Frustum::from_view_projection(&view_projection),
        }
    }

    /// Containment/visibility test of a bounding box against the frustum.
    pub fn is_in_frustum(&self, aabb: &Aabb) -> bool {
        self.frustum.contains_aabb(aabb)
    }

    /// A view snapshot whose frustum accepts everything.
    ///
    /// Useful for headless tests of the streaming layer, where no real
    /// projection exists. Degenerate (all-zero) planes never separate a box.
    #[cfg(test)]
    pub fn accept_all(position: Point3<f32>) -> Self {
        CameraView {
            position,
            frustum: Frustum::default(),
        }
    }
}
