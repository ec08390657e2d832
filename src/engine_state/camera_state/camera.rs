//! # Camera Implementation
//!
//! This module contains the observer-side camera contract consumed by the
//! streaming and rendering layers:
//! - `Camera`: position and orientation in 3D space, view matrix math
//! - `Projection`: perspective projection settings
//! - `CameraController`: minimal fly-camera input accumulation
//!
//! The camera is an external collaborator from the streamer's point of view:
//! the world only ever reads `position` and the frustum test derived from
//! the view-projection matrix.

use cgmath::*;
use std::f32::consts::FRAC_PI_2;
use std::time::Duration;

/// Transformation matrix to convert from OpenGL's clip space to WGPU's.
///
/// WGPU's normalized device coordinates range from 0 to 1 in Z, while
/// `cgmath::perspective` produces OpenGL-style [-1, 1]. This matrix scales
/// and translates Z accordingly.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Safe limit for pitch to prevent gimbal lock.
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// A first-person camera in 3D space.
#[derive(Debug)]
pub struct Camera {
    /// The camera's position in world space.
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians.
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians.
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Calculates the view matrix transforming world space to camera space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(
            self.position,
            Vector3::new(
                self.yaw.0.cos() * self.pitch.0.cos(),
                self.pitch.0.sin(),
                self.yaw.0.sin() * self.pitch.0.cos(),
            )
            .normalize(),
            Vector3::unit_y(),
        )
    }

    /// Applies accumulated controller input, then resets the controller's
    /// per-frame deltas.
    pub fn apply_controller(&mut self, controller: &mut CameraController, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let forward = Vector3::new(yaw_cos, 0.0, yaw_sin).normalize();
        let right = Vector3::new(-yaw_sin, 0.0, yaw_cos).normalize();
        self.position += forward
            * (controller.amount_forward - controller.amount_backward)
            * controller.speed
            * dt;
        self.position +=
            right * (controller.amount_right - controller.amount_left) * controller.speed * dt;
        self.position.y += (controller.amount_up - controller.amount_down) * controller.speed * dt;

        self.yaw += Rad(controller.rotate_horizontal) * controller.sensitivity * dt;
        self.pitch += Rad(-controller.rotate_vertical) * controller.sensitivity * dt;
        controller.rotate_horizontal = 0.0;
        controller.rotate_vertical = 0.0;

        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }
}

/// A camera's perspective projection parameters.
#[derive(Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// Creates a new projection with the given viewport size and field of view.
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the projection's aspect ratio for viewport resizing.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Replaces the vertical field of view.
    pub fn set_fovy<F: Into<Rad<f32>>>(&mut self, fovy: F) {
        self.fovy = fovy.into();
    }

    /// Calculates the projection matrix, including the WGPU clip-space
    /// correction.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Accumulates movement and rotation input for a free-flying camera.
///
/// Input handling proper lives outside the engine core; this struct is just
/// the hand-off point between the window event loop and the camera.
#[derive(Debug)]
pub struct CameraController {
    amount_left: f32,
    amount_right: f32,
    amount_forward: f32,
    amount_backward: f32,
    amount_up: f32,
    amount_down: f32,
    rotate_horizontal: f32,
    rotate_vertical: f32,
    speed: f32,
    sensitivity: f32,
}

impl CameraController {
    /// Creates a new controller with the given speed and mouse sensitivity.
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self {
            amount_left: 0.0,
            amount_right: 0.0,
            amount_forward: 0.0,
            amount_backward: 0.0,
            amount_up: 0.0,
            amount_down: 0.0,
            rotate_horizontal: 0.0,
            rotate_vertical: 0.0,
            speed,
            sensitivity,
        }
    }

    /// Records the pressed state of one movement axis.
    pub fn set_movement(&mut self, key: MovementKey, pressed: bool) {
        let amount = if pressed { 1.0 } else { 0.0 };
        match key {
            MovementKey::Forward => self.amount_forward = amount,
            MovementKey::Backward => self.amount_backward = amount,
            MovementKey::Left => self.amount_left = amount,
            MovementKey::Right => self.amount_right = amount,
            MovementKey::Up => self.amount_up = amount,
            MovementKey::Down => self.amount_down = amount,
        }
    }

    /// Accumulates a relative mouse movement.
    pub fn add_mouse_delta(&mut self, delta_x: f64, delta_y: f64) {
        self.rotate_horizontal += delta_x as f32;
        self.rotate_vertical += delta_y as f32;
    }
}

/// The movement axes a window event can map onto the controller.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MovementKey {
    /// Move along the camera's forward direction.
    Forward,
    /// Move against the camera's forward direction.
    Backward,
    /// Strafe left.
    Left,
    /// Strafe right.
    Right,
    /// Ascend.
    Up,
    /// Descend.
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_moves_camera_forward() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        let mut controller = CameraController::new(10.0, 1.0);
        controller.set_movement(MovementKey::Forward, true);
        camera.apply_controller(&mut controller, Duration::from_secs(1));
        // Yaw 0 faces +X.
        assert!(camera.position.x > 9.0);
        assert!(camera.position.y.abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(0.0), Rad(0.0));
        let mut controller = CameraController::new(10.0, 100.0);
        controller.add_mouse_delta(0.0, -10_000.0);
        camera.apply_controller(&mut controller, Duration::from_secs(1));
        assert!(camera.pitch.0 <= SAFE_FRAC_PI_2);
    }
}
