// ============================================
// Mesh Module - Чанковые меши и их GPU-хранилище
// ============================================

mod data;
mod store;
mod vertex;

pub use data::{ChunkKey, ChunkMeshData, MeshData, CHUNK_SIZE};
pub use store::{ChunkMeshStore, GpuChunk, MaterialBuffers};
pub use vertex::ChunkVertex;
