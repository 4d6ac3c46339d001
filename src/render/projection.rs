// ============================================
// Projection - Проекция, обновляемая по событиям
// ============================================
// Проекцией владеет рендерер, камера отдаёт только view.
// Матрица пересчитывается по событию resize, а не каждый кадр;
// потребители сравнивают счётчик версий. При выключенной опции
// perspective_resize аспект заморожен.

use ultraviolet::Mat4;

use crate::core::config::RenderOptions;

pub struct Projection {
    fovy: f32,
    aspect: f32,
    near: f32,
    far: f32,
    perspective_resize: bool,
    version: u64,
}

impl Projection {
    pub fn new(options: &RenderOptions, width: u32, height: u32) -> Self {
        Self {
            fovy: options.fovy,
            aspect: aspect_of(width, height),
            near: options.near,
            far: options.far,
            perspective_resize: options.perspective_resize,
            // Версия стартует "грязной": первый кадр всегда пересчитывает
            version: 1,
        }
    }

    /// Perspective с Reversed-Z: near и far меняются местами,
    /// depth очищается нулём и сравнивается Greater
    pub fn matrix(&self) -> Mat4 {
        ultraviolet::projection::perspective_wgpu_dx(self.fovy, self.aspect, self.far, self.near)
    }

    /// Обработка resize-события. Нулевые размеры игнорируются,
    /// при выключенном perspective_resize аспект заморожен.
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if !self.perspective_resize || width == 0 || height == 0 {
            return;
        }

        let aspect = width as f32 / height as f32;
        if (aspect - self.aspect).abs() > f32::EPSILON {
            self.aspect = aspect;
            self.version += 1;
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RenderOptions {
        RenderOptions::default()
    }

    #[test]
    fn starts_dirty() {
        let proj = Projection::new(&options(), 1280, 720);
        assert_eq!(proj.version(), 1);
    }

    #[test]
    fn resize_bumps_version_once_per_change() {
        let mut proj = Projection::new(&options(), 1280, 720);
        proj.set_aspect(1920, 1080);
        assert_eq!(proj.version(), 2);
        assert!((proj.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

        // Тот же размер — версия не двигается
        proj.set_aspect(1920, 1080);
        assert_eq!(proj.version(), 2);
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut proj = Projection::new(&options(), 1280, 720);
        let before = proj.aspect();
        proj.set_aspect(0, 720);
        proj.set_aspect(1280, 0);
        assert_eq!(proj.version(), 1);
        assert_eq!(proj.aspect(), before);
    }

    #[test]
    fn perspective_resize_off_freezes_aspect() {
        let mut opts = options();
        opts.perspective_resize = false;
        let mut proj = Projection::new(&opts, 1280, 720);
        proj.set_aspect(640, 640);
        assert_eq!(proj.version(), 1);
        assert!((proj.aspect() - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn matrix_is_reversed_z() {
        // При Reversed-Z точка на near-плоскости проецируется в depth 1,
        // дальняя — ближе к 0
        let proj = Projection::new(&options(), 1000, 1000);
        let m = proj.matrix();

        let near_point = m * ultraviolet::Vec4::new(0.0, 0.0, -1.0, 1.0);
        let far_point = m * ultraviolet::Vec4::new(0.0, 0.0, -900.0, 1.0);
        let near_depth = near_point.z / near_point.w;
        let far_depth = far_point.z / far_point.w;

        assert!(near_depth > far_depth, "near {} far {}", near_depth, far_depth);
        assert!((near_depth - 1.0).abs() < 1e-3);
        assert!(far_depth < 0.01);
    }
}
