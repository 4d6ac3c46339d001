// ============================================
// Demo - Демо-сцена
// ============================================
// Собирает атлас, чанковые меши и модели и скармливает их
// рендереру при старте.

pub mod scene;
pub mod tiles;

use crate::render::{AtlasError, Renderer};

pub fn populate(renderer: &mut Renderer) -> Result<(), AtlasError> {
    let (pixels, width, height) = tiles::build_strip();
    renderer.set_atlas(&pixels, width, height, tiles::TILE_COUNT)?;

    let demo = scene::build();
    let chunk_count = demo.chunks.len();
    for chunk in &demo.chunks {
        renderer.upload_chunk(chunk);
    }

    let (plant_vertices, plant_indices) = scene::cross_model();
    let plant = renderer.register_model("plant", true, &plant_vertices, &plant_indices);
    renderer.set_model_instances(plant, demo.plants);

    let (post_vertices, post_indices) = scene::post_model();
    let post = renderer.register_model("post", false, &post_vertices, &post_indices);
    renderer.set_model_instances(post, demo.posts);

    log::info!("Demo scene ready: {} chunks", chunk_count);
    Ok(())
}
