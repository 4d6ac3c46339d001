// ============================================
// Frustum Culling - Отсечение невидимых чанков
// ============================================

use ultraviolet::Vec3;

use crate::mesh::{ChunkKey, CHUNK_SIZE};

/// Извлекает 6 плоскостей frustum из view-projection матрицы
/// Каждая плоскость: (nx, ny, nz, d) где nx*x + ny*y + nz*z + d >= 0 означает "внутри"
pub fn extract_frustum_planes(vp: &[[f32; 4]; 4]) -> [[f32; 4]; 6] {
    let m = vp;
    [
        // Left:   row3 + row0
        [m[0][3] + m[0][0], m[1][3] + m[1][0], m[2][3] + m[2][0], m[3][3] + m[3][0]],
        // Right:  row3 - row0
        [m[0][3] - m[0][0], m[1][3] - m[1][0], m[2][3] - m[2][0], m[3][3] - m[3][0]],
        // Bottom: row3 + row1
        [m[0][3] + m[0][1], m[1][3] + m[1][1], m[2][3] + m[2][1], m[3][3] + m[3][1]],
        // Top:    row3 - row1
        [m[0][3] - m[0][1], m[1][3] - m[1][1], m[2][3] - m[2][1], m[3][3] - m[3][1]],
        // Near:   row3 + row2
        [m[0][3] + m[0][2], m[1][3] + m[1][2], m[2][3] + m[2][2], m[3][3] + m[3][2]],
        // Far:    row3 - row2
        [m[0][3] - m[0][2], m[1][3] - m[1][2], m[2][3] - m[2][2], m[3][3] - m[3][2]],
    ]
}

/// Проверяет, находится ли AABB полностью снаружи плоскости frustum
fn is_aabb_outside_plane(plane: &[f32; 4], min: Vec3, max: Vec3) -> bool {
    let px = if plane[0] >= 0.0 { max.x } else { min.x };
    let py = if plane[1] >= 0.0 { max.y } else { min.y };
    let pz = if plane[2] >= 0.0 { max.z } else { min.z };

    plane[0] * px + plane[1] * py + plane[2] * pz + plane[3] < 0.0
}

/// Frustum culling: проверяет видимость AABB чанка
pub fn is_chunk_visible(view_proj: &[[f32; 4]; 4], key: &ChunkKey) -> bool {
    let [ox, oy, oz] = key.origin();
    let size = CHUNK_SIZE as f32;

    let min = Vec3::new(ox, oy, oz);
    let max = Vec3::new(ox + size, oy + size, oz + size);

    let planes = extract_frustum_planes(view_proj);

    for plane in &planes {
        if is_aabb_outside_plane(plane, min, max) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultraviolet::{Mat4, Vec3};

    fn view_proj_from_origin() -> [[f32; 4]; 4] {
        // Камера в (16, 16, 100) смотрит в сторону -Z, Reversed-Z проекция
        let proj = ultraviolet::projection::perspective_wgpu_dx(
            std::f32::consts::FRAC_PI_4,
            16.0 / 9.0,
            1000.0,
            1.0,
        );
        let eye = Vec3::new(16.0, 16.0, 100.0);
        let view = Mat4::look_at(eye, Vec3::new(16.0, 16.0, 0.0), Vec3::unit_y());
        (proj * view).into()
    }

    #[test]
    fn chunk_in_front_is_visible() {
        let vp = view_proj_from_origin();
        // Чанк (0,0,0) занимает 0..32 по всем осям, прямо перед камерой
        assert!(is_chunk_visible(&vp, &ChunkKey::new(0, 0, 0)));
    }

    #[test]
    fn chunk_behind_camera_is_culled() {
        let vp = view_proj_from_origin();
        // Камера на z=100, чанк с z в 320..352 строго позади
        assert!(!is_chunk_visible(&vp, &ChunkKey::new(0, 0, 10)));
    }

    #[test]
    fn chunk_far_to_the_side_is_culled() {
        let vp = view_proj_from_origin();
        assert!(!is_chunk_visible(&vp, &ChunkKey::new(100, 0, 0)));
    }
}
