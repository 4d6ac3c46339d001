// ============================================
// Chunk Mesh Store - GPU буферы чанков
// ============================================
// Динамически меняющееся множество мешей, по которому
// идут оба прохода кадра. Пустые материалы не получают
// буферов, полностью пустые чанки не хранятся вовсе.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::render::uniforms::ChunkUniform;
use super::data::{ChunkKey, ChunkMeshData, MeshData};

/// Буферы одного материала чанка
pub struct MaterialBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MaterialBuffers {
    fn new(device: &wgpu::Device, label: &str, mesh: &MeshData) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Решение upload(): пустые данные снимают запись целиком,
/// непустые замещают её новым набором буферов
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum UploadDecision {
    Remove,
    Replace { solid: bool, porous: bool },
}

fn decide_upload(data: &ChunkMeshData) -> UploadDecision {
    let solid = !data.solid.is_empty();
    let porous = !data.porous.is_empty();
    if !solid && !porous {
        UploadDecision::Remove
    } else {
        UploadDecision::Replace { solid, porous }
    }
}

/// GPU-ресурсы одного чанка: буферы материалов + offset uniform
pub struct GpuChunk {
    pub key: ChunkKey,
    pub solid: Option<MaterialBuffers>,
    pub porous: Option<MaterialBuffers>,
    #[allow(dead_code)]
    offset_buffer: wgpu::Buffer,
    pub offset_bind_group: wgpu::BindGroup,
}

impl GpuChunk {
    fn new(
        device: &wgpu::Device,
        chunk_layout: &wgpu::BindGroupLayout,
        data: &ChunkMeshData,
        has_solid: bool,
        has_porous: bool,
    ) -> Self {
        let key = data.key;

        let solid = has_solid
            .then(|| MaterialBuffers::new(device, &format!("Chunk {:?} Solid", key), &data.solid));
        let porous = has_porous
            .then(|| MaterialBuffers::new(device, &format!("Chunk {:?} Porous", key), &data.porous));

        let offset_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Chunk {:?} Offset", key)),
            contents: bytemuck::cast_slice(&[ChunkUniform::new(key.origin())]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let offset_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("Chunk {:?} BG", key)),
            layout: chunk_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: offset_buffer.as_entire_binding(),
            }],
        });

        Self {
            key,
            solid,
            porous,
            offset_buffer,
            offset_bind_group,
        }
    }
}

/// Хранилище GPU чанков
pub struct ChunkMeshStore {
    chunks: HashMap<ChunkKey, GpuChunk>,
    device: Arc<wgpu::Device>,
}

impl ChunkMeshStore {
    pub fn new(device: Arc<wgpu::Device>) -> Self {
        Self {
            chunks: HashMap::with_capacity(256),
            device,
        }
    }

    /// Загрузить (или заменить) чанк. Оба материала заменяются
    /// атомарно; полностью пустой чанк удаляет существующую запись.
    pub fn upload(&mut self, chunk_layout: &wgpu::BindGroupLayout, data: &ChunkMeshData) {
        match decide_upload(data) {
            UploadDecision::Remove => {
                self.chunks.remove(&data.key);
            }
            UploadDecision::Replace { solid, porous } => {
                let gpu_chunk = GpuChunk::new(&self.device, chunk_layout, data, solid, porous);
                self.chunks.insert(data.key, gpu_chunk);
            }
        }
    }

    pub fn remove(&mut self, key: &ChunkKey) {
        self.chunks.remove(key);
    }

    /// Удаляет чанки которых нет в списке нужных
    pub fn retain_only(&mut self, valid_keys: &HashSet<ChunkKey>) {
        self.chunks.retain(|key, _| valid_keys.contains(key));
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Есть ли хоть один чанк с porous-геометрией
    /// (если нет — porous-проход вообще не кодируется)
    pub fn has_porous(&self) -> bool {
        self.chunks.values().any(|c| c.porous.is_some())
    }

    /// Итератор по всем GPU чанкам для рендеринга
    pub fn iter(&self) -> impl Iterator<Item = &GpuChunk> {
        self.chunks.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_quad() -> MeshData {
        let mut mesh = MeshData::default();
        mesh.push_quad(
            [[0, 0, 0], [1, 0, 0], [1, 1, 0], [0, 1, 0]],
            [255; 4],
            [0, 0, 1],
            0,
        );
        mesh
    }

    #[test]
    fn empty_chunk_is_never_stored() {
        let data = ChunkMeshData::new(ChunkKey::new(0, 0, 0));
        assert_eq!(decide_upload(&data), UploadDecision::Remove);
    }

    #[test]
    fn reupload_replaces_both_materials() {
        // solid-only перезалив выключает porous явно: старая
        // porous-геометрия не переживает замену записи
        let mut data = ChunkMeshData::new(ChunkKey::new(1, 0, 0));
        data.solid = one_quad();
        assert_eq!(
            decide_upload(&data),
            UploadDecision::Replace {
                solid: true,
                porous: false
            }
        );
    }

    #[test]
    fn water_only_chunk_is_stored() {
        let mut data = ChunkMeshData::new(ChunkKey::new(0, 0, 1));
        data.porous = one_quad();
        assert_eq!(
            decide_upload(&data),
            UploadDecision::Replace {
                solid: false,
                porous: true
            }
        );
    }
}
