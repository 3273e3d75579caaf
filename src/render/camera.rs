use crate::input::InputState;
use glam::{Mat4, Vec3};

const DEFAULT_YAW: f32 = -90.0;
const PITCH_LIMIT: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;

/// First-person fly camera. Yaw/pitch are in degrees; the derived basis
/// vectors are kept normalized after every rotation.
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    move_speed: f32,
    mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self::with_settings(position, 5.0, 0.1)
    }

    pub fn with_settings(position: Vec3, move_speed: f32, mouse_sensitivity: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            fov: MAX_FOV,
            move_speed,
            mouse_sensitivity,
        };
        camera.update_vectors();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Applies one frame's polled input snapshot: keyboard movement scaled
    /// by `dt`, accumulated mouse delta as look rotation, scroll as zoom.
    pub fn apply_input(&mut self, input: &InputState, dt: f32) {
        let step = self.move_speed * dt;
        if input.forward {
            self.position += self.front * step;
        }
        if input.backward {
            self.position -= self.front * step;
        }
        if input.left {
            self.position -= self.right * step;
        }
        if input.right {
            self.position += self.right * step;
        }
        if input.up {
            self.position += self.world_up * step;
        }
        if input.down {
            self.position -= self.world_up * step;
        }

        if input.mouse_delta != glam::Vec2::ZERO {
            self.rotate(input.mouse_delta.x, input.mouse_delta.y);
        }
        if input.scroll_delta != 0.0 {
            self.zoom(input.scroll_delta);
        }
    }

    /// Mouse-look. `dy` is in window coordinates (positive = downward), so
    /// it subtracts from pitch.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.mouse_sensitivity;
        self.pitch -= dy * self.mouse_sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    pub fn zoom(&mut self, scroll: f32) {
        self.fov = (self.fov - scroll).clamp(MIN_FOV, MAX_FOV);
    }

    fn update_vectors(&mut self) {
        let (yaw_sin, yaw_cos) = self.yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.to_radians().sin_cos();

        self.front = Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos).normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn new_camera_faces_negative_z() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 3.0));
        assert_close(camera.front, Vec3::NEG_Z);
        assert_close(camera.up, Vec3::Y);
    }

    #[test]
    fn view_matrix_moves_camera_position_to_origin() {
        let position = Vec3::new(1.0, 2.0, 3.0);
        let camera = Camera::new(position);
        let eye = camera.view_matrix() * position.extend(1.0);
        assert!(eye.truncate().length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped_at_89_degrees() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.rotate(0.0, -100_000.0);
        assert!((camera.pitch - PITCH_LIMIT).abs() < 1e-5);
        camera.rotate(0.0, 100_000.0);
        assert!((camera.pitch + PITCH_LIMIT).abs() < 1e-5);
    }

    #[test]
    fn fov_is_clamped_to_its_range() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.zoom(1_000.0);
        assert_eq!(camera.fov_degrees(), MIN_FOV);
        camera.zoom(-1_000.0);
        assert_eq!(camera.fov_degrees(), MAX_FOV);
    }

    #[test]
    fn forward_input_moves_along_the_view_direction() {
        let mut camera = Camera::new(Vec3::ZERO);
        let mut input = InputState::new();
        input.forward = true;
        camera.apply_input(&input, 1.0);
        assert_close(camera.position(), Vec3::NEG_Z * 5.0);
    }

    #[test]
    fn strafe_is_perpendicular_to_the_view_direction() {
        let mut camera = Camera::new(Vec3::ZERO);
        let mut input = InputState::new();
        input.right = true;
        camera.apply_input(&input, 1.0);
        assert!(camera.position().dot(camera.front).abs() < 1e-5);
    }
}
