// ============================================
// Voxel Shader - Рендер-плагин воксельного мира
// ============================================
// Связывает шейдеры, упакованные AO-вершины, матрицы камеры и
// чанковые меши в пер-кадровые draw call'ы: сначала solid-проход,
// затем porous-проход с блендингом.

pub mod camera;
pub mod core;
pub mod demo;
pub mod mesh;
pub mod models;
pub mod render;
