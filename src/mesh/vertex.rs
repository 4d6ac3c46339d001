// ============================================
// Chunk Vertex - Упакованная вершина чанка
// ============================================
// 8 байт на вершину: два атрибута Uint8x4.
// attrib0 = локальная позиция + ambient occlusion,
// attrib1 = нормаль со смещением +127 + индекс тайла.

/// Вершина чанкового меша. Внешний мешер отдаёт уже упакованные данные:
/// позиция в локальных координатах чанка (0..255), AO в диапазоне 0..255,
/// нормаль покомпонентно как `n * 127 + 127`, тайл как индекс в атласе.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct ChunkVertex {
    pub position: [u8; 3],
    pub ao: u8,
    pub normal: [u8; 3],
    pub tile: u8,
}

impl ChunkVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ChunkVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Uint8x4,
                },
                wgpu::VertexAttribute {
                    offset: 4,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Uint8x4,
                },
            ],
        }
    }

    /// Создать вершину из неупакованной нормали (покомпонентно -1, 0 или 1)
    pub fn new(position: [u8; 3], ao: u8, normal: [i8; 3], tile: u8) -> Self {
        Self {
            position,
            ao,
            normal: [
                pack_normal(normal[0]),
                pack_normal(normal[1]),
                pack_normal(normal[2]),
            ],
            tile,
        }
    }

    /// Распакованная нормаль (для проверок на CPU)
    pub fn unpacked_normal(&self) -> [f32; 3] {
        [
            unpack_normal(self.normal[0]),
            unpack_normal(self.normal[1]),
            unpack_normal(self.normal[2]),
        ]
    }
}

fn pack_normal(n: i8) -> u8 {
    (n as i16 * 127 + 127) as u8
}

fn unpack_normal(v: u8) -> f32 {
    (v as f32 - 127.0) / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_8_bytes() {
        assert_eq!(std::mem::size_of::<ChunkVertex>(), 8);
    }

    #[test]
    fn normal_packing_roundtrip() {
        for n in [-1i8, 0, 1] {
            let v = ChunkVertex::new([0, 0, 0], 255, [n, 0, 0], 0);
            let unpacked = v.unpacked_normal();
            assert!((unpacked[0] - n as f32).abs() < 0.01, "normal {} -> {}", n, unpacked[0]);
            assert_eq!(unpacked[1], 0.0);
            assert_eq!(unpacked[2], 0.0);
        }
    }

    #[test]
    fn desc_covers_both_attributes() {
        let desc = ChunkVertex::desc();
        assert_eq!(desc.array_stride, 8);
        assert_eq!(desc.attributes.len(), 2);
        assert_eq!(desc.attributes[0].offset, 0);
        assert_eq!(desc.attributes[1].offset, 4);
        assert_eq!(desc.attributes[0].shader_location, 0);
        assert_eq!(desc.attributes[1].shader_location, 1);
    }
}
