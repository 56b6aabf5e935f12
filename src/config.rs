use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Top level of the optional JSON config. Every section falls back to the
/// stock desk scene setup, so `{}` is a valid file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub render: RenderConfig,
    pub textures: TextureConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Desk Scene".to_string(),
            width: 1400,
            height: 1200,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub front: [f32; 3],
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [3.0, 12.0, 15.0],
            front: [0.0, -0.5, -2.0],
            speed: 2.5,
            sensitivity: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub ortho_half_height: f32,
    pub start_orthographic: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fovy: 45.0,
            near: 0.1,
            far: 100.0,
            ortho_half_height: 10.0,
            start_orthographic: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub clear_color: [f32; 3],
    pub ssaa: usize,
    pub cull_back_faces: bool,
    pub lighting: bool,
    pub shader: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0],
            ssaa: 1,
            cull_back_faces: false,
            lighting: true,
            shader: "phong".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub dir: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("textures"),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            Error::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn aspect(&self) -> f32 {
        self.window.width as f32 / self.window.height as f32
    }

    /// SSAA factor clamped to something the frame buffer can divide by.
    pub fn ssaa_factor(&self) -> usize {
        self.render.ssaa.clamp(1, 4)
    }
}

pub fn rgb_to_argb(color: [f32; 3]) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u32;
    0xFF000000 | channel(color[0]) << 16 | channel(color[1]) << 8 | channel(color[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.window.width, 1400);
        assert_eq!(config.window.height, 1200);
        assert_eq!(config.camera.position, [3.0, 12.0, 15.0]);
        assert_eq!(config.projection.fovy, 45.0);
        assert!(config.render.lighting);
        assert!(!config.render.cull_back_faces);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "camera": { "speed": 7.5 }, "render": { "ssaa": 9 } }"#)
                .unwrap();
        assert_eq!(config.camera.speed, 7.5);
        assert_eq!(config.camera.sensitivity, 0.1);
        assert_eq!(config.ssaa_factor(), 4);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = AppConfig::from_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn argb_packing() {
        assert_eq!(rgb_to_argb([0.0, 0.0, 0.0]), 0xFF000000);
        assert_eq!(rgb_to_argb([1.0, 0.0, 1.0]), 0xFFFF00FF);
        assert_eq!(rgb_to_argb([2.0, -1.0, 1.0]), 0xFFFF00FF);
    }
}
