use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub window_title: String,
    pub vsync: bool,
    /// OBJ file to display; the built-in cube is used when unset.
    pub model_path: Option<PathBuf>,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub near_plane: f32,
    pub far_plane: f32,
    pub clear_color: [f32; 4],
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 800,
            window_title: "meshview".to_string(),
            vsync: true,
            model_path: None,
            vertex_shader: PathBuf::from("assets/shaders/model.vert"),
            fragment_shader: PathBuf::from("assets/shaders/model.frag"),
            near_plane: 0.1,
            far_plane: 100.0,
            clear_color: [0.1, 0.1, 0.1, 1.0],
            move_speed: 5.0,
            mouse_sensitivity: 0.1,
        }
    }
}

impl ViewerConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// Loads the config file when present, falling back to defaults on a
    /// missing or unparsable file (with a warning for the latter).
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("{err}; using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = ViewerConfig::default();
        assert!(config.near_plane > 0.0);
        assert!(config.near_plane < config.far_plane);
        assert!(config.model_path.is_none());
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: ViewerConfig = toml::from_str(
            r#"
            window_width = 1280
            window_height = 720
            model_path = "assets/models/backpack.obj"
            "#,
        )
        .expect("partial config must parse");

        assert_eq!(config.window_width, 1280);
        assert_eq!(config.window_height, 720);
        assert_eq!(
            config.model_path.as_deref(),
            Some(Path::new("assets/models/backpack.obj"))
        );
        assert_eq!(config.far_plane, ViewerConfig::default().far_plane);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ViewerConfig::load_or_default("no/such/meshview.toml");
        assert_eq!(config.window_width, 800);
    }
}
