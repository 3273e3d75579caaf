use crate::input::PolygonMode;
use crate::render::camera::Camera;
use crate::render::model::Model;
use crate::render::shader::ShaderProgram;
use glam::Mat4;

/// Owns the per-frame draw path: clear, matrix setup, program activation,
/// uniform upload, model draw — in that order. Activation must precede the
/// uniform uploads and both must precede the draw, because the current
/// program is unsynchronized process-wide GL state.
pub struct SceneRenderer {
    shader: ShaderProgram,
    model: Model,
    model_transform: Mat4,
    clear_color: [f32; 4],
    near_plane: f32,
    far_plane: f32,
}

impl SceneRenderer {
    pub fn new(
        shader: ShaderProgram,
        model: Model,
        clear_color: [f32; 4],
        near_plane: f32,
        far_plane: f32,
    ) -> Self {
        Self {
            shader,
            model,
            model_transform: Mat4::IDENTITY,
            clear_color,
            near_plane,
            far_plane,
        }
    }

    pub fn set_model_transform(&mut self, transform: Mat4) {
        self.model_transform = transform;
    }

    pub fn set_polygon_mode(&self, mode: PolygonMode) {
        let gl_mode = match mode {
            PolygonMode::Fill => gl::FILL,
            PolygonMode::Line => gl::LINE,
            PolygonMode::Point => gl::POINT,
        };
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, gl_mode);
        }
    }

    pub fn render_frame(&mut self, camera: &Camera, aspect_ratio: f32) {
        unsafe {
            gl::ClearColor(
                self.clear_color[0],
                self.clear_color[1],
                self.clear_color[2],
                self.clear_color[3],
            );
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        let view = camera.view_matrix();
        let projection = Mat4::perspective_rh_gl(
            camera.fov_degrees().to_radians(),
            aspect_ratio,
            self.near_plane,
            self.far_plane,
        );

        self.shader.set_used();
        self.shader.set_mat4("projection", &projection);
        self.shader.set_mat4("view", &view);
        self.shader.set_mat4("model", &self.model_transform);

        self.model.draw(&mut self.shader);
    }
}
