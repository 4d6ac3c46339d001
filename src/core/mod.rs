// ============================================
// Core - Оболочка и настройки
// ============================================

pub mod app;
pub mod config;

pub use app::App;
pub use config::{CameraChoice, ConfigError, RenderOptions};
