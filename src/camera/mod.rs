// ============================================
// Camera - Абстракция камеры
// ============================================
// Рендерер не знает, кто управляет камерой: он запрашивает
// view-матрицу и позицию глаза через трейт CameraRig.

use ultraviolet::{Mat4, Vec3};

use crate::core::config::{CameraChoice, RenderOptions};

pub mod fly;
pub mod orbit;

pub use fly::FlyCamera;
pub use orbit::OrbitCamera;

/// Источник view-матрицы для рендерера
pub trait CameraRig {
    /// Матрица вида текущего кадра
    fn view_matrix(&self) -> Mat4;

    /// Позиция глаза в мире
    fn position(&self) -> Vec3;
}

/// Активная камера приложения
pub enum Rig {
    Fly(FlyCamera),
    Orbit(OrbitCamera),
}

impl Rig {
    pub fn from_options(options: &RenderOptions) -> Self {
        match options.camera {
            CameraChoice::Fly => Rig::Fly(FlyCamera::new(Vec3::new(16.0, 18.0, 56.0))),
            CameraChoice::Orbit => {
                Rig::Orbit(OrbitCamera::new(Vec3::new(16.0, 8.0, 16.0), 45.0))
            }
        }
    }

    pub fn process_keyboard(&mut self, key: winit::keyboard::KeyCode, pressed: bool) {
        if let Rig::Fly(cam) = self {
            cam.process_keyboard(key, pressed);
        }
    }

    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        match self {
            Rig::Fly(cam) => cam.process_mouse(dx, dy),
            Rig::Orbit(cam) => cam.process_mouse(dx, dy),
        }
    }

    pub fn process_scroll(&mut self, delta: f32) {
        if let Rig::Orbit(cam) = self {
            cam.process_scroll(delta);
        }
    }

    pub fn update(&mut self, dt: f32) {
        if let Rig::Fly(cam) = self {
            cam.update(dt);
        }
    }

    /// Камера как источник матриц для рендерера
    pub fn as_camera(&self) -> &dyn CameraRig {
        match self {
            Rig::Fly(cam) => cam,
            Rig::Orbit(cam) => cam,
        }
    }
}
