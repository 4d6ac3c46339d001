// ============================================
// OrbitCamera - Облёт вокруг точки
// ============================================
// Камера на сфере вокруг цели: мышь вращает, колесо меняет дистанцию.

use ultraviolet::{Mat4, Vec3};

use super::CameraRig;

const PITCH_LIMIT: f32 = 1.54;
const MIN_DISTANCE: f32 = 2.0;
const MAX_DISTANCE: f32 = 100.0;

pub struct OrbitCamera {
    pub target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,

    pub sensitivity: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.5,
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            sensitivity: 0.005,
        }
    }

    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        self.yaw += dx as f32 * self.sensitivity;
        self.pitch += dy as f32 * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn process_scroll(&mut self, delta: f32) {
        self.distance = (self.distance - delta * 2.0).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Позиция камеры на орбитальной сфере
    fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        ) * self.distance;
        self.target + offset
    }
}

impl CameraRig for OrbitCamera {
    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.eye(), self.target, Vec3::unit_y())
    }

    fn position(&self) -> Vec3 {
        self.eye()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_clamped() {
        let mut cam = OrbitCamera::new(Vec3::zero(), 40.0);
        cam.process_scroll(1000.0);
        assert_eq!(cam.distance(), MIN_DISTANCE);

        cam.process_scroll(-1000.0);
        assert_eq!(cam.distance(), MAX_DISTANCE);
    }

    #[test]
    fn eye_stays_on_sphere() {
        let mut cam = OrbitCamera::new(Vec3::new(16.0, 6.0, 16.0), 30.0);
        for _ in 0..10 {
            cam.process_mouse(13.0, -7.0);
            let r = (cam.position() - cam.target).mag();
            assert!((r - 30.0).abs() < 1e-3);
        }
    }
}
