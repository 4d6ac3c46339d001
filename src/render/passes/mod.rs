// ============================================
// Passes - Проходы кадра
// ============================================

pub mod porous;
pub mod solid;
