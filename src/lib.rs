pub mod config;
pub mod input;
pub mod render;

// Re-export commonly used types
pub use config::{ConfigError, ViewerConfig};
pub use input::{InputState, PolygonMode};
pub use render::camera::Camera;
pub use render::mesh::{Mesh, MeshData, MeshError, Vertex};
pub use render::model::{Model, ModelError};
pub use render::scene::SceneRenderer;
pub use render::shader::{ShaderError, ShaderProgram, ShaderStage};
pub use render::texture::{Texture, TextureError, TextureKind};
