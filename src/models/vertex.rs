// ============================================
// Model Vertex - Вершины и инстансы блок-моделей
// ============================================
// Кастомная геометрия (растения, столбики) не проходит через
// упаковку чанковых вершин: юнит-геометрия во float, позиция
// блока приходит пер-инстанс.

use bytemuck::{Pod, Zeroable};

/// Вершина юнит-геометрии модели
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, Default)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl ModelVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, normal, uv }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Один инстанс модели в мире
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ModelInstance {
    pub offset: [f32; 3],
    pub tile: u32,
    pub tint: [f32; 3],
    pub _pad: f32,
}

impl ModelInstance {
    pub fn new(offset: [f32; 3], tile: u32) -> Self {
        Self {
            offset,
            tile,
            tint: [1.0, 1.0, 1.0],
            _pad: 0.0,
        }
    }

    pub fn with_tint(offset: [f32; 3], tile: u32, tint: [f32; 3]) -> Self {
        Self { offset, tile, tint, _pad: 0.0 }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 3,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12,
                    shader_location: 4,
                    format: wgpu::VertexFormat::Uint32,
                },
                wgpu::VertexAttribute {
                    offset: 16,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<ModelVertex>(), 32);
        assert_eq!(std::mem::size_of::<ModelInstance>(), 32);
    }

    #[test]
    fn instance_attributes_follow_vertex_attributes() {
        // Локации инстанса не должны пересекаться с вершинными (0..2)
        for attr in ModelInstance::desc().attributes {
            assert!(attr.shader_location >= 3);
        }
        assert_eq!(ModelInstance::desc().step_mode, wgpu::VertexStepMode::Instance);
    }
}
