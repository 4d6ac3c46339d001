// ============================================
// Model Set - Инстансированные блок-модели
// ============================================
// Юнит-геометрия регистрируется один раз, множество инстансов
// меняется на лету. Перезаливка инстанс-буферов отслеживается
// счётчиком версий: prepare() ничего не делает пока версия
// не изменилась, буферы переиспользуются и никогда не ужимаются.

use wgpu::util::DeviceExt;

use super::vertex::{ModelInstance, ModelVertex};

/// Идентификатор зарегистрированной модели
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ModelId(usize);

/// Юнит-геометрия одной блок-модели
pub struct BlockModel {
    pub name: String,
    /// porous-модели рисуются во втором проходе с блендингом
    pub porous: bool,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl BlockModel {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        porous: bool,
        vertices: &[ModelVertex],
        indices: &[u32],
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Model {} Vertices", name)),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("Model {} Indices", name)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: name.to_string(),
            porous,
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }
}

struct InstanceBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

/// Новая ёмкость инстанс-буфера: никогда не меньше текущей
fn grow_capacity(current: usize, needed: usize) -> usize {
    needed.next_power_of_two().max(current).max(16)
}

/// Счётчик изменений множества и отметка последней заливки
struct UploadGate {
    version: u64,
    uploaded: u64,
}

impl UploadGate {
    fn new() -> Self {
        // свежий набор сразу требует заливки
        Self {
            version: 1,
            uploaded: 0,
        }
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    fn needs_upload(&self) -> bool {
        self.version != self.uploaded
    }

    fn mark_uploaded(&mut self) {
        self.uploaded = self.version;
    }
}

/// Все блок-модели и их инстансы
pub struct ModelSet {
    models: Vec<BlockModel>,
    instances: Vec<Vec<ModelInstance>>,
    buffers: Vec<Option<InstanceBuffer>>,
    gate: UploadGate,
}

impl ModelSet {
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            instances: Vec::new(),
            buffers: Vec::new(),
            gate: UploadGate::new(),
        }
    }

    pub fn register(
        &mut self,
        device: &wgpu::Device,
        name: &str,
        porous: bool,
        vertices: &[ModelVertex],
        indices: &[u32],
    ) -> ModelId {
        let id = ModelId(self.models.len());
        self.models.push(BlockModel::new(device, name, porous, vertices, indices));
        self.instances.push(Vec::new());
        self.buffers.push(None);
        self.gate.bump();
        id
    }

    pub fn set_instances(&mut self, id: ModelId, instances: Vec<ModelInstance>) {
        self.instances[id.0] = instances;
        self.gate.bump();
    }

    pub fn push_instance(&mut self, id: ModelId, instance: ModelInstance) {
        self.instances[id.0].push(instance);
        self.gate.bump();
    }

    pub fn clear_instances(&mut self, id: ModelId) {
        if !self.instances[id.0].is_empty() {
            self.instances[id.0].clear();
            self.gate.bump();
        }
    }

    pub fn has_solid_instances(&self) -> bool {
        self.models
            .iter()
            .zip(&self.instances)
            .any(|(m, inst)| !m.porous && !inst.is_empty())
    }

    pub fn has_porous_instances(&self) -> bool {
        self.models
            .iter()
            .zip(&self.instances)
            .any(|(m, inst)| m.porous && !inst.is_empty())
    }

    /// Перезалить инстанс-буферы если множество изменилось
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) {
        if !self.gate.needs_upload() {
            return;
        }

        for (i, items) in self.instances.iter().enumerate() {
            if items.is_empty() {
                if let Some(buf) = &mut self.buffers[i] {
                    buf.count = 0;
                }
                continue;
            }

            // Буфер достаточной ёмкости переиспользуется, тесный
            // или отсутствующий замещается новым
            let buf = match &mut self.buffers[i] {
                Some(buf) if buf.capacity >= items.len() => buf,
                slot => {
                    let current = slot.as_ref().map_or(0, |b| b.capacity);
                    let capacity = grow_capacity(current, items.len());
                    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                        label: Some(&format!("Model {} Instances", self.models[i].name)),
                        size: (capacity * std::mem::size_of::<ModelInstance>())
                            as wgpu::BufferAddress,
                        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                        mapped_at_creation: false,
                    });
                    slot.insert(InstanceBuffer {
                        buffer,
                        capacity,
                        count: 0,
                    })
                }
            };

            queue.write_buffer(&buf.buffer, 0, bytemuck::cast_slice(items));
            buf.count = items.len() as u32;
        }

        self.gate.mark_uploaded();
    }

    pub fn draw_solid(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_filtered(render_pass, false);
    }

    pub fn draw_porous(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        self.draw_filtered(render_pass, true);
    }

    fn draw_filtered(&self, render_pass: &mut wgpu::RenderPass<'_>, porous: bool) {
        for (model, buf) in self.models.iter().zip(&self.buffers) {
            if model.porous != porous {
                continue;
            }
            let Some(buf) = buf else { continue };
            if buf.count == 0 {
                continue;
            }

            render_pass.set_vertex_buffer(0, model.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, buf.buffer.slice(..));
            render_pass.set_index_buffer(model.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..model.index_count, 0, 0..buf.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_never_shrinks() {
        assert_eq!(grow_capacity(0, 1), 16);
        assert_eq!(grow_capacity(16, 17), 32);
        assert_eq!(grow_capacity(64, 20), 64);
        assert_eq!(grow_capacity(64, 100), 128);
    }

    #[test]
    fn capacity_covers_request() {
        for needed in [1usize, 15, 16, 17, 100, 1000] {
            for current in [0usize, 16, 256] {
                let cap = grow_capacity(current, needed);
                assert!(cap >= needed);
                assert!(cap >= current);
            }
        }
    }

    #[test]
    fn upload_gate_starts_dirty() {
        // первый prepare всегда выполняет заливку
        assert!(UploadGate::new().needs_upload());
    }

    #[test]
    fn upload_gate_reopens_only_on_change() {
        let mut gate = UploadGate::new();
        gate.mark_uploaded();
        assert!(!gate.needs_upload());

        // повторная отметка без изменений ничего не меняет
        gate.mark_uploaded();
        assert!(!gate.needs_upload());

        gate.bump();
        assert!(gate.needs_upload());
        gate.mark_uploaded();
        assert!(!gate.needs_upload());
    }
}
