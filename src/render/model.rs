use crate::render::mesh::{Mesh, MeshData, MeshError, Vertex};
use crate::render::shader::ShaderProgram;
use crate::render::texture::{Texture, TextureError, TextureKind};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse model file: {0}")]
    Parse(#[from] tobj::LoadError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error("model path {0} has no parent directory")]
    BadPath(PathBuf),
}

/// A loaded model: its meshes in file order plus the directory texture
/// references were resolved against.
#[derive(Debug)]
pub struct Model {
    meshes: Vec<Mesh>,
    directory: PathBuf,
}

impl Model {
    /// Loads an OBJ file, delegating parsing to tobj. Material texture
    /// paths are resolved relative to the model's directory; a texture file
    /// referenced by several meshes is loaded once and shared.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let directory = path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| ModelError::BadPath(path.to_path_buf()))?;

        let (models, materials) = tobj::load_obj(path, &tobj::GPU_LOAD_OPTIONS)?;
        let materials = match materials {
            Ok(materials) => materials,
            Err(err) => {
                log::warn!(
                    "failed to load materials for {}: {err}; rendering untextured",
                    path.display()
                );
                Vec::new()
            }
        };

        let mut texture_cache: HashMap<PathBuf, Arc<Texture>> = HashMap::new();
        let mut meshes = Vec::with_capacity(models.len());

        for model in &models {
            let mesh = &model.mesh;
            let vertex_count = mesh.positions.len() / 3;

            let mut vertices = Vec::with_capacity(vertex_count);
            for i in 0..vertex_count {
                let position = [
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                ];
                let normal = if mesh.normals.len() >= 3 * (i + 1) {
                    [
                        mesh.normals[3 * i],
                        mesh.normals[3 * i + 1],
                        mesh.normals[3 * i + 2],
                    ]
                } else {
                    [0.0, 0.0, 0.0]
                };
                let tex_coords = if mesh.texcoords.len() >= 2 * (i + 1) {
                    [mesh.texcoords[2 * i], mesh.texcoords[2 * i + 1]]
                } else {
                    [0.0, 0.0]
                };
                vertices.push(Vertex {
                    position,
                    normal,
                    tex_coords,
                });
            }

            let mut textures = Vec::new();
            if let Some(material) = mesh.material_id.and_then(|id| materials.get(id)) {
                if let Some(name) = &material.diffuse_texture {
                    textures.push(load_cached(
                        &mut texture_cache,
                        &directory,
                        name,
                        TextureKind::Diffuse,
                    )?);
                }
                if let Some(name) = &material.specular_texture {
                    textures.push(load_cached(
                        &mut texture_cache,
                        &directory,
                        name,
                        TextureKind::Specular,
                    )?);
                }
            }

            let data = MeshData::new(vertices, mesh.indices.clone(), textures)?;
            meshes.push(Mesh::new(data));
        }

        log::info!("loaded {} mesh(es) from {}", meshes.len(), path.display());
        Ok(Self { meshes, directory })
    }

    /// Wraps already-uploaded meshes, e.g. the built-in cube fallback.
    pub fn from_meshes(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            directory: PathBuf::new(),
        }
    }

    /// Draws every mesh in load order. A model with no meshes issues no
    /// draw calls.
    pub fn draw(&self, shader: &mut ShaderProgram) {
        for mesh in &self.meshes {
            mesh.draw(shader);
        }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn load_cached(
    cache: &mut HashMap<PathBuf, Arc<Texture>>,
    directory: &Path,
    name: &str,
    kind: TextureKind,
) -> Result<Arc<Texture>, TextureError> {
    let path = directory.join(name);
    if let Some(texture) = cache.get(&path) {
        return Ok(Arc::clone(texture));
    }

    let texture = Arc::new(Texture::from_file(&path, kind)?);
    cache.insert(path, Arc::clone(&texture));
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_has_no_meshes() {
        let model = Model::from_meshes(Vec::new());
        assert_eq!(model.mesh_count(), 0);
    }

    #[test]
    fn missing_model_file_is_a_parse_error() {
        let err = Model::from_file("does/not/exist.obj")
            .expect_err("a missing model file must fail to load");
        assert!(matches!(err, ModelError::Parse(_)));
    }
}
