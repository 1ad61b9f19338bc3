//! Orbit camera: a pose described by a target point plus spherical
//! (yaw, pitch, distance) placement, with the derived view/projection
//! matrices used for rendering.

use cgmath::*;

use super::camera_utils::{convert_matrix4_to_array, Camera, CameraUniform};

/// wgpu clip space has z in [0, 1] where OpenGL uses [-1, 1]; this
/// remaps cgmath's projection output.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Pose restored by [`OrbitCamera::reset`].
pub const DEFAULT_DISTANCE: f32 = 5.0;
pub const DEFAULT_YAW: f32 = std::f32::consts::FRAC_PI_4;
pub const DEFAULT_PITCH: f32 = std::f32::consts::FRAC_PI_6;

/// Multiplicative zoom base: each scroll tick scales distance by this
/// factor, so perceived zoom speed is the same at any distance.
const ZOOM_FACTOR: f32 = 1.1;

/// Extra headroom when framing a bounding box.
const FRAME_MARGIN: f32 = 1.2;

#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vector3<f32>,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub bounds: OrbitCameraBounds,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl Camera for OrbitCamera {
    fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let bounds = OrbitCameraBounds::default();
        Self {
            distance: distance.clamp(bounds.min_distance, bounds.max_distance),
            pitch: pitch.clamp(bounds.min_pitch, bounds.max_pitch),
            yaw: yaw.rem_euclid(std::f32::consts::TAU),
            target,
            bounds,
            aspect,
            fovy: Rad(std::f32::consts::FRAC_PI_4),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        }
    }

    /// Eye position from the spherical pose around the target.
    pub fn eye(&self) -> Vector3<f32> {
        self.target
            + self.distance
                * Vector3::new(
                    self.pitch.cos() * self.yaw.sin(),
                    self.pitch.sin(),
                    self.pitch.cos() * self.yaw.cos(),
                )
    }

    /// Rotates around the target. Yaw wraps modulo a full turn; pitch
    /// clamps short of the poles so the look direction never becomes
    /// parallel to world up.
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + delta_pitch).clamp(self.bounds.min_pitch, self.bounds.max_pitch);
    }

    /// Translates the target in the camera's right/up plane. Deltas are
    /// scaled by the current distance, so a drag moves the scene by the
    /// same apparent amount regardless of framing.
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vector3::unit_y()).normalize();
        let up = right.cross(forward).normalize();

        self.target += (right * -delta_x + up * delta_y) * self.distance;
    }

    /// Multiplicative zoom, clamped to the distance bounds.
    pub fn zoom(&mut self, delta_scroll: f32) {
        self.distance = (self.distance * ZOOM_FACTOR.powf(-delta_scroll))
            .clamp(self.bounds.min_distance, self.bounds.max_distance);
    }

    /// Moves the target to the box center and backs off far enough to
    /// fit the box's bounding sphere in the vertical field of view, with
    /// some margin. A degenerate box (zero extent) gets the default
    /// distance instead of a division by zero.
    pub fn frame(&mut self, box_min: Vector3<f32>, box_max: Vector3<f32>) {
        self.target = (box_min + box_max) * 0.5;

        let radius = (box_max - box_min).magnitude() * 0.5;
        if radius > f32::EPSILON {
            let fit = radius / (self.fovy.0 * 0.5).tan() * FRAME_MARGIN;
            self.distance = fit.clamp(self.bounds.min_distance, self.bounds.max_distance);
        } else {
            self.distance = DEFAULT_DISTANCE;
        }
    }

    /// Restores the fixed default pose.
    pub fn reset(&mut self) {
        self.target = Vector3::zero();
        self.distance = DEFAULT_DISTANCE;
        self.yaw = DEFAULT_YAW;
        self.pitch = DEFAULT_PITCH;
    }

    /// View matrix looking from the derived eye at the target with +Y
    /// world up. The pitch clamp in [`orbit`](Self::orbit) keeps the
    /// look direction away from the up vector, so this never degenerates.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye()),
            Point3::from_vec(self.target),
            Vector3::unit_y(),
        )
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Refreshes the GPU-facing uniform from the current pose.
    pub fn update_view_proj(&mut self) {
        let eye = self.eye();
        self.uniform.view_position = [eye.x, eye.y, eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }
}

/// Hard limits on the orbit pose. Pitch stays short of straight up/down
/// to avoid the projection singularity at the poles.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCameraBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraBounds {
    fn default() -> Self {
        let max_pitch = 89.0f32.to_radians();
        Self {
            min_distance: 0.1,
            max_distance: 500.0,
            min_pitch: -max_pitch,
            max_pitch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(5.0, 0.4, 0.2, Vector3::zero(), 16.0 / 9.0)
    }

    fn assert_matrix_finite(matrix: Matrix4<f32>) {
        let values: [[f32; 4]; 4] = matrix.into();
        assert!(values.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn zoom_round_trips_within_tolerance() {
        let mut cam = camera();
        let original = cam.distance;
        cam.zoom(3.5);
        assert!(cam.distance < original);
        cam.zoom(-3.5);
        assert!((cam.distance - original).abs() < 1e-4);
    }

    #[test]
    fn zoom_clamps_at_distance_bounds() {
        let mut cam = camera();
        for _ in 0..500 {
            cam.zoom(1.0);
        }
        assert_eq!(cam.distance, cam.bounds.min_distance);
        for _ in 0..500 {
            cam.zoom(-1.0);
        }
        assert_eq!(cam.distance, cam.bounds.max_distance);
    }

    #[test]
    fn pitch_never_exceeds_clamp_boundary() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.orbit(0.0, 0.3);
        }
        assert_eq!(cam.pitch, cam.bounds.max_pitch);

        for delta in [-0.05, -1.7, -0.3, -10.0] {
            for _ in 0..50 {
                cam.orbit(0.0, delta);
            }
        }
        assert_eq!(cam.pitch, cam.bounds.min_pitch);
    }

    #[test]
    fn yaw_wraps_modulo_full_turn() {
        let mut cam = camera();
        cam.orbit(7.0 * std::f32::consts::TAU + 0.25, 0.0);
        assert!(cam.yaw >= 0.0 && cam.yaw < std::f32::consts::TAU);
        cam.orbit(-100.0, 0.0);
        assert!(cam.yaw >= 0.0 && cam.yaw < std::f32::consts::TAU);
    }

    #[test]
    fn framing_degenerate_box_falls_back_to_default_distance() {
        let mut cam = camera();
        let point = Vector3::new(3.0, 1.0, -2.0);
        cam.frame(point, point);
        assert_eq!(cam.distance, DEFAULT_DISTANCE);
        assert!(cam.distance.is_finite());
        assert_eq!(cam.target, point);
    }

    #[test]
    fn framing_fits_box_center_and_positive_distance() {
        let mut cam = camera();
        cam.frame(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(3.0, 1.0, 1.0));
        assert_eq!(cam.target, Vector3::new(1.0, 0.0, 0.0));
        assert!(cam.distance > 0.0 && cam.distance.is_finite());
        assert_matrix_finite(cam.build_view_projection_matrix());
    }

    #[test]
    fn pan_speed_scales_with_distance() {
        let mut near = camera();
        near.distance = 2.0;
        let mut far = camera();
        far.distance = 4.0;

        near.pan(0.1, 0.0);
        far.pan(0.1, 0.0);

        let near_offset = near.target.magnitude();
        let far_offset = far.target.magnitude();
        assert!((far_offset - 2.0 * near_offset).abs() < 1e-5);
    }

    #[test]
    fn matrices_stay_finite_at_pitch_extremes() {
        let mut cam = camera();
        cam.orbit(0.0, 100.0);
        cam.update_view_proj();
        assert_matrix_finite(cam.view_matrix());
        assert_matrix_finite(cam.projection_matrix());
        assert!(cam.uniform.view_proj.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn reset_restores_default_pose() {
        let mut cam = camera();
        cam.orbit(1.0, 0.5);
        cam.zoom(5.0);
        cam.pan(0.4, 0.2);
        cam.reset();
        assert_eq!(cam.distance, DEFAULT_DISTANCE);
        assert_eq!(cam.yaw, DEFAULT_YAW);
        assert_eq!(cam.pitch, DEFAULT_PITCH);
        assert_eq!(cam.target, Vector3::zero());
    }
}
