use gl::types::*;
use image::ImageReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to open image at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode image at {path}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("unsupported channel count {channels}, expected 1, 3 or 4")]
    UnsupportedChannelCount { channels: u8 },
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    PixelSizeMismatch { expected: usize, actual: usize },
}

/// Semantic tag deciding which shader sampler slot a texture binds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
}

impl TextureKind {
    pub fn sampler_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
        }
    }
}

#[derive(Debug)]
pub struct Texture {
    id: GLuint,
    kind: TextureKind,
    width: u32,
    height: u32,
}

impl Texture {
    pub fn from_file(path: impl AsRef<Path>, kind: TextureKind) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = ImageReader::open(path)
            .map_err(|source| TextureError::Io {
                path: path.to_path_buf(),
                source,
            })?
            .decode()
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?;

        let channels = image.color().channel_count();
        let format = gl_format(channels)
            .ok_or(TextureError::UnsupportedChannelCount { channels })?;

        let (width, height) = (image.width(), image.height());
        let pixels: Vec<u8> = match channels {
            1 => image.into_luma8().into_raw(),
            3 => image.into_rgb8().into_raw(),
            _ => image.into_rgba8().into_raw(),
        };

        log::debug!(
            "loaded texture {} ({}x{}, {} channels)",
            path.display(),
            width,
            height,
            channels
        );

        Ok(Self {
            id: upload(width, height, format, &pixels),
            kind,
            width,
            height,
        })
    }

    /// Builds a texture from raw pixel rows, tightly packed.
    pub fn from_pixels(
        width: u32,
        height: u32,
        channels: u8,
        pixels: &[u8],
        kind: TextureKind,
    ) -> Result<Self, TextureError> {
        let format = gl_format(channels)
            .ok_or(TextureError::UnsupportedChannelCount { channels })?;

        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(TextureError::PixelSizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            id: upload(width, height, format, pixels),
            kind,
            width,
            height,
        })
    }

    /// Grey checkerboard used when a mesh carries no material textures.
    pub fn checkerboard(kind: TextureKind) -> Self {
        const SIZE: u32 = 8;
        let mut pixels = Vec::with_capacity((SIZE * SIZE * 3) as usize);
        for y in 0..SIZE {
            for x in 0..SIZE {
                let value = if (x + y) % 2 == 0 { 200 } else { 90 };
                pixels.extend_from_slice(&[value, value, value]);
            }
        }

        Self {
            id: upload(SIZE, SIZE, gl::RGB, &pixels),
            kind,
            width: SIZE,
            height: SIZE,
        }
    }

    pub fn bind(&self) {
        unsafe {
            gl::BindTexture(gl::TEXTURE_2D, self.id);
        }
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> TextureKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteTextures(1, &self.id);
        }
    }
}

fn gl_format(channels: u8) -> Option<GLenum> {
    match channels {
        1 => Some(gl::RED),
        3 => Some(gl::RGB),
        4 => Some(gl::RGBA),
        _ => None,
    }
}

fn upload(width: u32, height: u32, format: GLenum, pixels: &[u8]) -> GLuint {
    let mut id = 0;
    unsafe {
        gl::GenTextures(1, &mut id);
        gl::BindTexture(gl::TEXTURE_2D, id);
        // Rows are tightly packed for every supported channel count.
        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        gl::TexImage2D(
            gl::TEXTURE_2D,
            0,
            format as GLint,
            width as GLsizei,
            height as GLsizei,
            0,
            format,
            gl::UNSIGNED_BYTE,
            pixels.as_ptr() as *const _,
        );
        gl::GenerateMipmap(gl::TEXTURE_2D);

        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, gl::REPEAT as i32);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, gl::REPEAT as i32);
        gl::TexParameteri(
            gl::TEXTURE_2D,
            gl::TEXTURE_MIN_FILTER,
            gl::LINEAR_MIPMAP_LINEAR as i32,
        );
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, gl::LINEAR as i32);

        gl::BindTexture(gl::TEXTURE_2D, 0);
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_counts_map_to_formats() {
        assert_eq!(gl_format(1), Some(gl::RED));
        assert_eq!(gl_format(3), Some(gl::RGB));
        assert_eq!(gl_format(4), Some(gl::RGBA));
    }

    #[test]
    fn odd_channel_counts_are_rejected() {
        assert_eq!(gl_format(0), None);
        assert_eq!(gl_format(2), None);
        assert_eq!(gl_format(5), None);
    }

    #[test]
    fn from_pixels_rejects_unsupported_channels_before_touching_gl() {
        let err = Texture::from_pixels(2, 2, 2, &[0; 8], TextureKind::Diffuse)
            .expect_err("two channels must be rejected");
        assert!(matches!(
            err,
            TextureError::UnsupportedChannelCount { channels: 2 }
        ));
    }

    #[test]
    fn from_pixels_rejects_short_buffers_before_touching_gl() {
        let err = Texture::from_pixels(2, 2, 3, &[0; 5], TextureKind::Diffuse)
            .expect_err("a short pixel buffer must be rejected");
        assert!(matches!(
            err,
            TextureError::PixelSizeMismatch {
                expected: 12,
                actual: 5
            }
        ));
    }

    #[test]
    fn sampler_prefixes_follow_the_uniform_name_contract() {
        assert_eq!(TextureKind::Diffuse.sampler_prefix(), "texture_diffuse");
        assert_eq!(TextureKind::Specular.sampler_prefix(), "texture_specular");
    }
}
