// ============================================
// Voxel Shader - точка входа демо
// ============================================

use std::path::Path;

use voxel_shader::core::config::{RenderOptions, OPTIONS_FILE};

fn main() {
    let options = match RenderOptions::load_or_default(Path::new(OPTIONS_FILE)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Failed to load {}: {}", OPTIONS_FILE, e);
            std::process::exit(1);
        }
    };

    voxel_shader::core::app::run(options);
}
