// ============================================
// Shader Sources - Загрузка исходников шейдеров
// ============================================
// По умолчанию WGSL вшит в бинарник. Опция shader_dir позволяет
// подменить любой из файлов с диска (solid.wgsl / porous.wgsl /
// model.wgsl); отсутствующий файл откатывается на вшитую копию.

use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug)]
pub enum ShaderError {
    Io(std::io::Error),
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Io(e) => write!(f, "shader read error: {}", e),
        }
    }
}

impl From<std::io::Error> for ShaderError {
    fn from(e: std::io::Error) -> Self {
        ShaderError::Io(e)
    }
}

pub struct ShaderSources {
    pub solid: String,
    pub porous: String,
    pub model: String,
}

impl ShaderSources {
    /// Вшитые исходники
    pub fn embedded() -> Self {
        Self {
            solid: include_str!("shaders/solid.wgsl").to_string(),
            porous: include_str!("shaders/porous.wgsl").to_string(),
            model: include_str!("shaders/model.wgsl").to_string(),
        }
    }

    /// Загрузить из каталога, по-файлово откатываясь на вшитую
    /// копию если файла нет. Прочие ошибки ввода-вывода — ошибка.
    pub fn load(dir: &Path) -> Result<Self, ShaderError> {
        let embedded = Self::embedded();
        Ok(Self {
            solid: load_or(dir, "solid.wgsl", embedded.solid)?,
            porous: load_or(dir, "porous.wgsl", embedded.porous)?,
            model: load_or(dir, "model.wgsl", embedded.model)?,
        })
    }
}

fn load_or(dir: &Path, name: &str, fallback: String) -> Result<String, ShaderError> {
    match std::fs::read_to_string(dir.join(name)) {
        Ok(source) => {
            log::info!("shader {} loaded from {}", name, dir.display());
            Ok(source)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::warn!("shader {} not found in {}, using embedded", name, dir.display());
            Ok(fallback)
        }
        Err(e) => Err(ShaderError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_sources_have_entry_points() {
        let sources = ShaderSources::embedded();
        for source in [&sources.solid, &sources.porous, &sources.model] {
            assert!(source.contains("vs_main"));
            assert!(source.contains("fs_main"));
        }
        // Модельный шейдер инстансированный, чанковые — упакованные атрибуты
        assert!(sources.model.contains("InstanceInput"));
        assert!(sources.solid.contains("attrib0"));
        assert!(sources.porous.contains("attrib0"));
    }

    #[test]
    fn missing_dir_falls_back_to_embedded() {
        let dir = std::env::temp_dir().join("voxel-shader-test-empty-dir");
        let _ = std::fs::create_dir_all(&dir);

        let sources = ShaderSources::load(&dir).unwrap();
        assert_eq!(sources.solid, ShaderSources::embedded().solid);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_on_disk_wins_over_embedded() {
        let dir = std::env::temp_dir().join("voxel-shader-test-override");
        let _ = std::fs::create_dir_all(&dir);
        std::fs::write(dir.join("porous.wgsl"), "// override\nfn vs_main() {}").unwrap();

        let sources = ShaderSources::load(&dir).unwrap();
        assert!(sources.porous.starts_with("// override"));
        // Остальные остаются вшитыми
        assert_eq!(sources.solid, ShaderSources::embedded().solid);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
