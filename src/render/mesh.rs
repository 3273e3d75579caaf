use crate::render::shader::ShaderProgram;
use crate::render::texture::{Texture, TextureKind};
use bytemuck::{Pod, Zeroable};
use gl::types::*;
use glam::Vec3;
use std::mem;
use std::ptr;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Interleaved vertex layout shared with the vertex shader: attribute 0 is
/// position, 1 is normal, 2 is texture coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

/// CPU-side mesh contents, validated before any GPU buffer is allocated.
#[derive(Debug)]
pub struct MeshData {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    textures: Vec<Arc<Texture>>,
}

impl MeshData {
    pub fn new(
        vertices: Vec<Vertex>,
        indices: Vec<u32>,
        textures: Vec<Arc<Texture>>,
    ) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        Ok(Self {
            vertices,
            indices,
            textures,
        })
    }

    /// Unit cube with 8 shared corner vertices and 12 triangles, used as
    /// the fallback scene when no model file is configured.
    pub fn cube(textures: Vec<Arc<Texture>>) -> Self {
        const POSITIONS: [[f32; 3]; 8] = [
            [-0.5, -0.5, -0.5],
            [0.5, -0.5, -0.5],
            [0.5, 0.5, -0.5],
            [-0.5, 0.5, -0.5],
            [-0.5, -0.5, 0.5],
            [0.5, -0.5, 0.5],
            [0.5, 0.5, 0.5],
            [-0.5, 0.5, 0.5],
        ];
        const INDICES: [u32; 36] = [
            0, 1, 2, 2, 3, 0, // back
            4, 5, 6, 6, 7, 4, // front
            0, 4, 7, 7, 3, 0, // left
            1, 5, 6, 6, 2, 1, // right
            3, 2, 6, 6, 7, 3, // top
            0, 1, 5, 5, 4, 0, // bottom
        ];

        let vertices = POSITIONS
            .iter()
            .map(|&position| {
                let normal = Vec3::from(position).normalize();
                Vertex {
                    position,
                    normal: normal.to_array(),
                    tex_coords: [position[0] + 0.5, position[1] + 0.5],
                }
            })
            .collect();

        Self {
            vertices,
            indices: INDICES.to_vec(),
            textures,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[Arc<Texture>] {
        &self.textures
    }
}

/// One drawable unit. The VAO/VBO/EBO triple is allocated exactly once at
/// construction and never reallocated; the buffers are released in `Drop`.
#[derive(Debug)]
pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    index_count: GLsizei,
    textures: Vec<Arc<Texture>>,
}

impl Mesh {
    pub fn new(data: MeshData) -> Self {
        let MeshData {
            vertices,
            indices,
            textures,
        } = data;

        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;
        let stride = mem::size_of::<Vertex>() as GLsizei;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (vertices.len() * mem::size_of::<Vertex>()) as GLsizeiptr,
                bytemuck::cast_slice::<_, u8>(&vertices).as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
                indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::EnableVertexAttribArray(0);
            gl::VertexAttribPointer(0, 3, gl::FLOAT, gl::FALSE, stride, ptr::null());
            gl::EnableVertexAttribArray(1);
            gl::VertexAttribPointer(
                1,
                3,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (3 * mem::size_of::<f32>()) as *const _,
            );
            gl::EnableVertexAttribArray(2);
            gl::VertexAttribPointer(
                2,
                2,
                gl::FLOAT,
                gl::FALSE,
                stride,
                (6 * mem::size_of::<f32>()) as *const _,
            );

            gl::BindVertexArray(0);
        }

        Self {
            vao,
            vbo,
            ebo,
            index_count: indices.len() as GLsizei,
            textures,
        }
    }

    /// Binds this mesh's textures to incrementing texture units, points the
    /// matching sampler uniforms at them and issues one indexed draw call.
    /// The shader program must already be current; uniform sets against an
    /// inactive program are no-ops.
    pub fn draw(&self, shader: &mut ShaderProgram) {
        let kinds: Vec<TextureKind> = self.textures.iter().map(|t| t.kind()).collect();
        let names = sampler_names(&kinds);

        for (unit, (texture, name)) in self.textures.iter().zip(&names).enumerate() {
            unsafe {
                gl::ActiveTexture(gl::TEXTURE0 + unit as GLuint);
            }
            shader.set_int(name, unit as i32);
            texture.bind();
        }

        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(
                gl::TRIANGLES,
                self.index_count,
                gl::UNSIGNED_INT,
                ptr::null(),
            );
            gl::BindVertexArray(0);
            // Leave unit 0 active so later draws start from a known state.
            gl::ActiveTexture(gl::TEXTURE0);
        }
    }

    pub fn index_count(&self) -> usize {
        self.index_count as usize
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

/// Synthesizes the sampler uniform name for each texture: the kind prefix
/// plus a 1-based counter that increments independently per kind, so two
/// diffuse maps become `texture_diffuse1` and `texture_diffuse2`.
pub fn sampler_names(kinds: &[TextureKind]) -> Vec<String> {
    let mut diffuse = 0u32;
    let mut specular = 0u32;

    kinds
        .iter()
        .map(|kind| {
            let index = match kind {
                TextureKind::Diffuse => {
                    diffuse += 1;
                    diffuse
                }
                TextureKind::Specular => {
                    specular += 1;
                    specular
                }
            };
            format!("{}{}", kind.sampler_prefix(), index)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_vertices() -> Vec<Vertex> {
        [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
            .iter()
            .map(|&position| Vertex {
                position,
                normal: [0.0, 0.0, 1.0],
                tex_coords: [0.0, 0.0],
            })
            .collect()
    }

    #[test]
    fn in_range_indices_are_accepted() {
        let data = MeshData::new(triangle_vertices(), vec![0, 1, 2], Vec::new())
            .expect("indices within bounds must validate");
        assert_eq!(data.vertices().len(), 3);
        assert_eq!(data.indices().len(), 3);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = MeshData::new(triangle_vertices(), vec![0, 1, 3], Vec::new())
            .expect_err("index 3 exceeds the vertex count");
        match err {
            MeshError::IndexOutOfRange {
                index,
                vertex_count,
            } => {
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
        }
    }

    #[test]
    fn any_index_into_empty_vertices_is_rejected() {
        assert!(MeshData::new(Vec::new(), vec![0], Vec::new()).is_err());
    }

    #[test]
    fn cube_has_eight_vertices_and_twelve_triangles() {
        let cube = MeshData::cube(Vec::new());
        assert_eq!(cube.vertices().len(), 8);
        assert_eq!(cube.indices().len(), 36);
        assert!(cube
            .indices()
            .iter()
            .all(|&i| (i as usize) < cube.vertices().len()));
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(mem::size_of::<Vertex>(), 8 * mem::size_of::<f32>());
    }

    #[test]
    fn same_kind_textures_get_distinct_sampler_names() {
        let names = sampler_names(&[TextureKind::Diffuse, TextureKind::Diffuse]);
        assert_eq!(names, vec!["texture_diffuse1", "texture_diffuse2"]);
    }

    #[test]
    fn sampler_counters_are_independent_per_kind() {
        let names = sampler_names(&[
            TextureKind::Diffuse,
            TextureKind::Specular,
            TextureKind::Diffuse,
            TextureKind::Specular,
        ]);
        assert_eq!(
            names,
            vec![
                "texture_diffuse1",
                "texture_specular1",
                "texture_diffuse2",
                "texture_specular2",
            ]
        );
    }

    #[test]
    fn no_textures_means_no_sampler_names() {
        assert!(sampler_names(&[]).is_empty());
    }
}
