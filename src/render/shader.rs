use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::ptr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source at {path}: {source}")]
    Io {
        stage: ShaderStage,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{stage} shader compilation failed: {log}")]
    Compilation { stage: ShaderStage, log: String },
    #[error("program linking failed: {0}")]
    Linking(String),
    #[error("shader source contains a NUL byte: {0}")]
    Nul(#[from] NulError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_kind(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// A linked GL program. A value of this type always holds a handle that
/// compiled and linked successfully; every failure path returns an error
/// before construction completes.
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_files(
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_source = read_source(ShaderStage::Vertex, vertex_path.as_ref())?;
        let fragment_source = read_source(ShaderStage::Fragment, fragment_path.as_ref())?;
        Self::from_sources(&vertex_source, &fragment_source)
    }

    pub fn from_sources(vertex_source: &str, fragment_source: &str) -> Result<Self, ShaderError> {
        let vertex = compile_stage(ShaderStage::Vertex, vertex_source)?;
        let fragment = match compile_stage(ShaderStage::Fragment, fragment_source) {
            Ok(shader) => shader,
            Err(err) => {
                unsafe { gl::DeleteShader(vertex) };
                return Err(err);
            }
        };

        let id = link_program(vertex, fragment)?;
        Ok(ShaderProgram {
            id,
            uniforms: HashMap::new(),
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Makes this program current for all subsequent draw calls. This is
    /// process-wide GL context state; it stays set until another program
    /// is activated.
    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(&location) = self.uniforms.get(name) {
            return location;
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("uniform '{}' not found in program {}", name, self.id);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    // Uniform setters. A name the linker optimized out resolves to
    // location -1, which GL treats as a no-op.
    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_int(name, value as i32);
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set_used();
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform1i(location, value);
        }
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set_used();
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform1f(location, value);
        }
    }

    pub fn set_vec3(&mut self, name: &str, value: glam::Vec3) {
        self.set_used();
        let location = self.uniform_location(name);
        unsafe {
            gl::Uniform3f(location, value.x, value.y, value.z);
        }
    }

    pub fn set_mat4(&mut self, name: &str, value: &glam::Mat4) {
        self.set_used();
        let location = self.uniform_location(name);
        let columns = value.to_cols_array();
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    fs::read_to_string(path).map_err(|source| ShaderError::Io {
        stage,
        path: path.to_path_buf(),
        source,
    })
}

fn compile_stage(stage: ShaderStage, source: &str) -> Result<GLuint, ShaderError> {
    let c_source = CString::new(source.as_bytes())?;

    let shader = unsafe { gl::CreateShader(stage.gl_kind()) };
    unsafe {
        gl::ShaderSource(shader, 1, &c_source.as_ptr(), ptr::null());
        gl::CompileShader(shader);
    }

    let mut success: GLint = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    }

    if success == 0 {
        let log = shader_info_log(shader);
        unsafe { gl::DeleteShader(shader) };
        return Err(ShaderError::Compilation { stage, log });
    }

    Ok(shader)
}

fn link_program(vertex: GLuint, fragment: GLuint) -> Result<GLuint, ShaderError> {
    let program = unsafe { gl::CreateProgram() };
    unsafe {
        gl::AttachShader(program, vertex);
        gl::AttachShader(program, fragment);
        gl::LinkProgram(program);
        // The program retains the linked machine code; the per-stage
        // objects are no longer needed.
        gl::DeleteShader(vertex);
        gl::DeleteShader(fragment);
    }

    let mut success: GLint = 0;
    unsafe {
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
    }

    if success == 0 {
        let log = program_info_log(program);
        unsafe { gl::DeleteProgram(program) };
        return Err(ShaderError::Linking(log));
    }

    Ok(program)
}

fn shader_info_log(shader: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe {
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
    }

    let mut buffer = vec![0u8; len.max(0) as usize];
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetShaderInfoLog(
            shader,
            buffer.len() as GLsizei,
            &mut written,
            buffer.as_mut_ptr() as *mut GLchar,
        );
    }

    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

fn program_info_log(program: GLuint) -> String {
    let mut len: GLint = 0;
    unsafe {
        gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
    }

    let mut buffer = vec![0u8; len.max(0) as usize];
    let mut written: GLsizei = 0;
    unsafe {
        gl::GetProgramInfoLog(
            program,
            buffer.len() as GLsizei,
            &mut written,
            buffer.as_mut_ptr() as *mut GLchar,
        );
    }

    buffer.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source_file_reports_stage_and_path() {
        let err = read_source(ShaderStage::Vertex, Path::new("does/not/exist.vert"))
            .expect_err("reading a missing file must fail");

        match err {
            ShaderError::Io { stage, path, .. } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(path.ends_with("exist.vert"));
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn stage_names_match_driver_terminology() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }
}
