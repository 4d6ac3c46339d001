// ============================================
// Uniforms - Uniform-структуры сцены и чанка
// ============================================

use bytemuck::{Pod, Zeroable};
use ultraviolet::{Mat4, Vec3};

/// Глобальные uniform-данные кадра (group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub eye: [f32; 3],
    pub tile_count: u32,
    pub sky_color: [f32; 3],
    pub _pad: f32,
}

impl SceneUniforms {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::identity().into(),
            view: Mat4::identity().into(),
            proj: Mat4::identity().into(),
            eye: [0.0, 0.0, 0.0],
            tile_count: 1,
            sky_color: [0.53, 0.71, 0.92],
            _pad: 0.0,
        }
    }

    /// Обновить матрицы: проекция приходит уже вычисленной,
    /// view берётся у камеры каждый кадр.
    pub fn update_matrices(&mut self, proj: Mat4, view: Mat4, eye: Vec3) {
        self.view_proj = (proj * view).into();
        self.view = view.into();
        self.proj = proj.into();
        self.eye = eye.into();
    }
}

/// Uniform одного чанка (group 2): позиция угла чанка в мире.
/// Оригинальная модельная матрица чанка — чистый перенос,
/// поэтому достаточно vec3.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ChunkUniform {
    pub offset: [f32; 3],
    pub _pad: f32,
}

impl ChunkUniform {
    pub fn new(offset: [f32; 3]) -> Self {
        Self { offset, _pad: 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_uniforms_layout() {
        // 3 матрицы + 2 блока по 16 байт, выравнивание под WGSL uniform
        assert_eq!(std::mem::size_of::<SceneUniforms>(), 224);
        assert_eq!(std::mem::size_of::<SceneUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<ChunkUniform>(), 16);
    }

    #[test]
    fn view_proj_is_product() {
        let mut u = SceneUniforms::new();
        let proj = ultraviolet::projection::perspective_wgpu_dx(1.0, 1.5, 1000.0, 1.0);
        let view = Mat4::look_at(
            Vec3::new(0.0, 10.0, 0.0),
            Vec3::new(0.0, 0.0, 10.0),
            Vec3::unit_y(),
        );
        u.update_matrices(proj, view, Vec3::new(0.0, 10.0, 0.0));

        let expected: [[f32; 4]; 4] = (proj * view).into();
        assert_eq!(u.view_proj, expected);
        assert_eq!(u.eye, [0.0, 10.0, 0.0]);
    }
}
