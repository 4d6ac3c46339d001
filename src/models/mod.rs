// ============================================
// Models Module - Пер-инстансная геометрия блоков
// ============================================

mod set;
mod vertex;

pub use set::{BlockModel, ModelId, ModelSet};
pub use vertex::{ModelInstance, ModelVertex};
