use glam::Vec2;
use winit::event::MouseScrollDelta;
use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonMode {
    #[default]
    Fill,
    Line,
    Point,
}

/// Input snapshot consumed once per frame by the render loop. Window and
/// device events accumulate into it between frames; `reset` clears the
/// per-frame deltas while key-hold state persists.
#[derive(Debug, Default)]
pub struct InputState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub mouse_delta: Vec2,
    pub scroll_delta: f32,
    pub polygon_mode: PolygonMode,
    pub exit_requested: bool,
    first_motion: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            first_motion: true,
            ..Default::default()
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::Space => self.up = pressed,
            KeyCode::ShiftLeft => self.down = pressed,
            KeyCode::KeyF if pressed => self.polygon_mode = PolygonMode::Fill,
            KeyCode::KeyL if pressed => self.polygon_mode = PolygonMode::Line,
            KeyCode::KeyP if pressed => self.polygon_mode = PolygonMode::Point,
            KeyCode::Escape if pressed => self.exit_requested = true,
            _ => {}
        }
    }

    /// Accumulates raw mouse motion. The very first delta after cursor
    /// capture is dropped, since it carries the jump from wherever the OS
    /// cursor happened to be.
    pub fn handle_mouse_move(&mut self, delta: Vec2) {
        if self.first_motion {
            self.first_motion = false;
            return;
        }
        self.mouse_delta += delta;
    }

    pub fn handle_scroll(&mut self, delta: MouseScrollDelta) {
        self.scroll_delta += match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 / 40.0,
        };
    }

    pub fn reset(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_keys_track_press_and_release() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyW, true);
        assert!(input.forward);
        input.handle_key(KeyCode::KeyW, false);
        assert!(!input.forward);
    }

    #[test]
    fn escape_latches_exit() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::Escape, true);
        input.handle_key(KeyCode::Escape, false);
        assert!(input.exit_requested);
    }

    #[test]
    fn first_mouse_motion_is_dropped() {
        let mut input = InputState::new();
        input.handle_mouse_move(Vec2::new(500.0, 300.0));
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        input.handle_mouse_move(Vec2::new(2.0, -1.0));
        input.handle_mouse_move(Vec2::new(1.0, 1.0));
        assert_eq!(input.mouse_delta, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn reset_clears_deltas_but_not_held_keys() {
        let mut input = InputState::new();
        input.handle_key(KeyCode::KeyD, true);
        input.handle_mouse_move(Vec2::ZERO);
        input.handle_mouse_move(Vec2::new(4.0, 4.0));
        input.handle_scroll(MouseScrollDelta::LineDelta(0.0, 2.0));
        input.reset();
        assert_eq!(input.mouse_delta, Vec2::ZERO);
        assert_eq!(input.scroll_delta, 0.0);
        assert!(input.right);
    }

    #[test]
    fn polygon_mode_keys_switch_the_mode() {
        let mut input = InputState::new();
        assert_eq!(input.polygon_mode, PolygonMode::Fill);
        input.handle_key(KeyCode::KeyL, true);
        assert_eq!(input.polygon_mode, PolygonMode::Line);
        input.handle_key(KeyCode::KeyP, true);
        assert_eq!(input.polygon_mode, PolygonMode::Point);
        input.handle_key(KeyCode::KeyF, true);
        assert_eq!(input.polygon_mode, PolygonMode::Fill);
    }
}
