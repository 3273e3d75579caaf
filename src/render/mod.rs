pub mod camera;
pub mod mesh;
pub mod model;
pub mod scene;
pub mod shader;
pub mod texture;

pub use scene::SceneRenderer;
pub use shader::ShaderProgram;
