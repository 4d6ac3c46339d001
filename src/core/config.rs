// ============================================
// Config - Настройки рендеринга
// ============================================
// JSON-файл рядом с бинарником. Отсутствующий файл означает
// настройки по умолчанию, битый файл — ошибка запуска.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Имя файла настроек
pub const OPTIONS_FILE: &str = "voxel-shader.json";

/// Какой камерой управляет приложение
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraChoice {
    Fly,
    Orbit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Вертикальный угол обзора, радианы
    pub fovy: f32,
    pub near: f32,
    pub far: f32,

    /// Пересчитывать ли проекцию при изменении размера окна
    pub perspective_resize: bool,

    pub camera: CameraChoice,

    /// Каталог с WGSL-файлами, переопределяющими встроенные шейдеры
    pub shader_dir: Option<PathBuf>,

    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            fovy: std::f32::consts::FRAC_PI_4,
            near: 1.0,
            far: 1000.0,
            perspective_resize: true,
            camera: CameraChoice::Fly,
            shader_dir: None,
            window_title: "Voxel Shader".to_string(),
            window_width: 1280,
            window_height: 720,
        }
    }
}

/// Ошибки загрузки настроек
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config io error: {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fovy > 0.0 && self.fovy < std::f32::consts::PI) {
            return Err(ConfigError::Invalid(format!(
                "fovy must be in (0, pi), got {}",
                self.fovy
            )));
        }
        if self.near <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "near must be positive, got {}",
                self.near
            )));
        }
        if self.near >= self.far {
            return Err(ConfigError::Invalid(format!(
                "near {} must be less than far {}",
                self.near, self.far
            )));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(ConfigError::Invalid("window size must be nonzero".to_string()));
        }
        Ok(())
    }

    /// Загрузить настройки; отсутствующий файл — не ошибка
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let options: RenderOptions = serde_json::from_str(&text)?;
                options.validate()?;
                log::info!("Loaded render options from {}", path.display());
                Ok(options)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No {} found, using default options", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let options = RenderOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.fovy, std::f32::consts::FRAC_PI_4);
        assert_eq!(options.near, 1.0);
        assert_eq!(options.far, 1000.0);
        assert!(options.perspective_resize);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options: RenderOptions =
            serde_json::from_str(r#"{ "fovy": 0.9, "camera": "orbit" }"#).unwrap();
        assert_eq!(options.fovy, 0.9);
        assert_eq!(options.camera, CameraChoice::Orbit);
        assert_eq!(options.far, 1000.0);
        assert_eq!(options.window_width, 1280);
    }

    #[test]
    fn serde_roundtrip() {
        let options = RenderOptions::default();
        let json = serde_json::to_string(&options).unwrap();
        let back: RenderOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(options, back);
    }

    #[test]
    fn rejects_bad_planes() {
        let mut options = RenderOptions::default();
        options.near = 500.0;
        options.far = 100.0;
        assert!(options.validate().is_err());

        options.near = -1.0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_bad_fov() {
        let mut options = RenderOptions::default();
        options.fovy = 0.0;
        assert!(options.validate().is_err());
        options.fovy = 4.0;
        assert!(options.validate().is_err());
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join("voxel-shader-options-missing.json");
        let _ = std::fs::remove_file(&path);
        let options = RenderOptions::load_or_default(&path).unwrap();
        assert_eq!(options, RenderOptions::default());
    }

    #[test]
    fn malformed_file_is_error() {
        let path = std::env::temp_dir().join("voxel-shader-options-broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let result = RenderOptions::load_or_default(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
        let _ = std::fs::remove_file(&path);
    }
}
