// ============================================
// FlyCamera - Свободный полёт (WASD + мышь)
// ============================================

use ultraviolet::{Mat4, Vec3};

use super::CameraRig;

/// Ограничение тангажа, чуть меньше 90 градусов
const PITCH_LIMIT: f32 = 1.54;

pub struct FlyCamera {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,

    pub speed: f32,
    pub sensitivity: f32,

    // Состояние клавиш
    forward: bool,
    backward: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            // Взгляд вдоль -Z
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
            speed: 20.0,
            sensitivity: 0.003,
            forward: false,
            backward: false,
            left: false,
            right: false,
            up: false,
            down: false,
        }
    }

    /// Направление взгляда из углов Эйлера
    fn forward_vector(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.cos(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.sin(),
        )
        .normalized()
    }

    pub fn process_keyboard(&mut self, key: winit::keyboard::KeyCode, pressed: bool) {
        use winit::keyboard::KeyCode;
        match key {
            KeyCode::KeyW => self.forward = pressed,
            KeyCode::KeyS => self.backward = pressed,
            KeyCode::KeyA => self.left = pressed,
            KeyCode::KeyD => self.right = pressed,
            KeyCode::Space => self.up = pressed,
            KeyCode::ShiftLeft => self.down = pressed,
            _ => {}
        }
    }

    pub fn process_mouse(&mut self, dx: f64, dy: f64) {
        self.yaw += dx as f32 * self.sensitivity;
        self.pitch -= dy as f32 * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Интеграция движения за кадр
    pub fn update(&mut self, dt: f32) {
        let fwd = self.forward_vector();
        let right = fwd.cross(Vec3::unit_y()).normalized();

        let mut dir = Vec3::zero();
        if self.forward {
            dir += fwd;
        }
        if self.backward {
            dir -= fwd;
        }
        if self.right {
            dir += right;
        }
        if self.left {
            dir -= right;
        }
        if self.up {
            dir += Vec3::unit_y();
        }
        if self.down {
            dir -= Vec3::unit_y();
        }

        if dir.mag() > 0.0 {
            self.position += dir.normalized() * self.speed * dt;
        }
    }
}

impl CameraRig for FlyCamera {
    fn view_matrix(&self) -> Mat4 {
        let target = self.position + self.forward_vector();
        Mat4::look_at(self.position, target, Vec3::unit_y())
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn moves_along_view_direction() {
        let mut cam = FlyCamera::new(Vec3::new(0.0, 10.0, 0.0));
        cam.process_keyboard(KeyCode::KeyW, true);
        cam.update(1.0);

        // Стартовый yaw смотрит вдоль -Z
        assert!(cam.position.z < -0.1);
        assert!((cam.position.x).abs() < 1e-4);
        assert!((cam.position.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::new(Vec3::zero());
        cam.process_mouse(0.0, -100000.0);
        let up = cam.forward_vector();
        assert!(up.y < 1.0);

        cam.process_mouse(0.0, 100000.0);
        let down = cam.forward_vector();
        assert!(down.y > -1.0);
    }

    #[test]
    fn stationary_without_input() {
        let mut cam = FlyCamera::new(Vec3::new(1.0, 2.0, 3.0));
        cam.update(0.5);
        assert_eq!(cam.position, Vec3::new(1.0, 2.0, 3.0));
    }
}
