// ============================================
// Chunk Mesh Data - CPU-сторона чанковых мешей
// ============================================
// Чанк несёт два независимых материала: solid (непрозрачный)
// и porous (полупрозрачный, вода/листва). Пустой материал
// просто не загружается на GPU.

use super::vertex::ChunkVertex;

/// Размер чанка в блоках
pub const CHUNK_SIZE: i32 = 32;

/// Ключ чанка: целочисленные координаты в сетке чанков
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Мировая позиция угла чанка (становится chunk offset uniform)
    pub fn origin(&self) -> [f32; 3] {
        [
            (self.x * CHUNK_SIZE) as f32,
            (self.y * CHUNK_SIZE) as f32,
            (self.z * CHUNK_SIZE) as f32,
        ]
    }
}

/// Геометрия одного материала одного чанка
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ChunkVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    /// Добавить квад: 4 угла в порядке CCW при взгляде снаружи,
    /// AO на угол, общая нормаль и тайл.
    pub fn push_quad(&mut self, corners: [[u8; 3]; 4], ao: [u8; 4], normal: [i8; 3], tile: u8) {
        let base = self.vertices.len() as u32;
        for i in 0..4 {
            self.vertices.push(ChunkVertex::new(corners[i], ao[i], normal, tile));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

/// Полный меш чанка: оба материала
#[derive(Clone, Debug)]
pub struct ChunkMeshData {
    pub key: ChunkKey,
    pub solid: MeshData,
    pub porous: MeshData,
}

impl ChunkMeshData {
    pub fn new(key: ChunkKey) -> Self {
        Self {
            key,
            solid: MeshData::default(),
            porous: MeshData::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.porous.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_scales_with_chunk_size() {
        let key = ChunkKey::new(1, -1, 2);
        assert_eq!(key.origin(), [32.0, -32.0, 64.0]);
    }

    #[test]
    fn push_quad_appends_four_vertices_six_indices() {
        let mut mesh = MeshData::default();
        mesh.push_quad(
            [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
            [255, 255, 200, 255],
            [0, 0, 1],
            3,
        );
        mesh.push_quad(
            [[0, 0, 1], [1, 0, 1], [1, 1, 1], [0, 1, 1]],
            [255; 4],
            [0, 0, 1],
            3,
        );
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.indices.len(), 12);
        // Индексы второго квада смещены на базу
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        // Все индексы указывают на существующие вершины
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn empty_means_both_materials_empty() {
        let key = ChunkKey::new(0, 0, 0);
        let mut data = ChunkMeshData::new(key);
        assert!(data.is_empty());

        data.porous.push_quad(
            [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
            [255; 4],
            [0, 0, 1],
            0,
        );
        assert!(!data.is_empty());
        assert!(data.solid.is_empty());
    }
}
