// ============================================
// Render - GPU-подсистема
// ============================================
// Проекция, пайплайны, атлас, проходы кадра и сам Renderer.

pub mod atlas;
pub mod depth;
pub mod frustum;
pub mod passes;
pub mod pipelines;
pub mod projection;
pub mod renderer;
pub mod shaders;
pub mod uniforms;

pub use atlas::AtlasError;
pub use renderer::{Renderer, RendererError};
