// ============================================
// Renderer - Оркестрация кадра
// ============================================
// Владеет surface/device/queue, проекцией, хранилищем чанков,
// множеством моделей и атласом. Рецепт кадра фиксирован:
// uniform'ы -> solid-проход -> porous-проход -> submit/present.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use ultraviolet::Mat4;
use wgpu::util::DeviceExt;

use crate::camera::CameraRig;
use crate::core::config::RenderOptions;
use crate::mesh::{ChunkKey, ChunkMeshData, ChunkMeshStore};
use crate::models::{ModelId, ModelInstance, ModelSet, ModelVertex};

use super::atlas::{AtlasBinding, AtlasError};
use super::depth::create_depth_texture;
use super::passes;
use super::pipelines::{BindGroupLayouts, Pipelines};
use super::projection::Projection;
use super::shaders::ShaderSources;
use super::uniforms::SceneUniforms;

const SKY_COLOR: [f32; 3] = [0.53, 0.71, 0.92];

/// Ошибки инициализации рендерера
#[derive(Debug)]
pub enum RendererError {
    Surface(String),
    Adapter(String),
    Device(String),
    Shader(String),
}

impl fmt::Display for RendererError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererError::Surface(e) => write!(f, "surface creation failed: {}", e),
            RendererError::Adapter(e) => write!(f, "no suitable GPU adapter: {}", e),
            RendererError::Device(e) => write!(f, "device request failed: {}", e),
            RendererError::Shader(e) => write!(f, "shader loading failed: {}", e),
        }
    }
}

impl std::error::Error for RendererError {}

pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,

    depth_texture: wgpu::TextureView,
    layouts: BindGroupLayouts,
    pipelines: Pipelines,

    uniforms: SceneUniforms,
    uniform_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,

    atlas: AtlasBinding,
    chunks: ChunkMeshStore,
    models: ModelSet,

    projection: Projection,
    cached_proj: Mat4,
    seen_projection_version: u64,
    cached_view_proj: [[f32; 4]; 4],
}

impl Renderer {
    pub async fn new(
        window: Arc<winit::window::Window>,
        options: &RenderOptions,
    ) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .map_err(|e| RendererError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| RendererError::Adapter(e.to_string()))?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Render Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| RendererError::Device(e.to_string()))?;

        let device = Arc::new(device);
        let queue = Arc::new(queue);

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);

        let sources = match &options.shader_dir {
            Some(dir) => {
                ShaderSources::load(dir).map_err(|e| RendererError::Shader(e.to_string()))?
            }
            None => ShaderSources::embedded(),
        };

        let layouts = BindGroupLayouts::new(&device);
        let pipelines = Pipelines::new(&device, config.format, &layouts, &sources);

        let uniforms = SceneUniforms::new();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene BG"),
            layout: &layouts.scene,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let atlas = AtlasBinding::placeholder(&device, &queue, &layouts.atlas);
        let chunks = ChunkMeshStore::new(Arc::clone(&device));
        let models = ModelSet::new();
        let projection = Projection::new(options, size.width, size.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            depth_texture,
            layouts,
            pipelines,
            uniforms,
            uniform_buffer,
            scene_bind_group,
            atlas,
            chunks,
            models,
            projection,
            cached_proj: Mat4::identity(),
            seen_projection_version: 0,
            cached_view_proj: Mat4::identity().into(),
        })
    }

    /// Resize-событие: переконфигурировать surface, пересоздать depth,
    /// передать новый аспект проекции
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
            self.projection.set_aspect(new_size.width, new_size.height);
        }
    }

    /// Обновление перед кадром: uniform'ы сцены и инстанс-буферы.
    /// Матрица проекции пересчитывается только если её версия
    /// сдвинулась (событие resize), view — каждый кадр.
    pub fn update(&mut self, rig: &dyn CameraRig) {
        if self.seen_projection_version != self.projection.version() {
            self.cached_proj = self.projection.matrix();
            self.seen_projection_version = self.projection.version();
        }

        self.uniforms.tile_count = self.atlas.tile_count();
        self.uniforms.sky_color = SKY_COLOR;
        self.uniforms
            .update_matrices(self.cached_proj, rig.view_matrix(), rig.position());
        self.cached_view_proj = self.uniforms.view_proj;

        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniforms]));

        self.models.prepare(&self.device, &self.queue);
    }

    /// Кадр: solid-проход, затем (если есть что блендить) porous-проход
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        passes::solid::render(
            &mut encoder,
            &view,
            &self.depth_texture,
            SKY_COLOR,
            &self.cached_view_proj,
            &self.pipelines,
            &self.scene_bind_group,
            &self.atlas.bind_group,
            &self.chunks,
            &self.models,
        );

        if self.chunks.has_porous() || self.models.has_porous_instances() {
            passes::porous::render(
                &mut encoder,
                &view,
                &self.depth_texture,
                &self.cached_view_proj,
                &self.pipelines,
                &self.scene_bind_group,
                &self.atlas.bind_group,
                &self.chunks,
                &self.models,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Установить сшитый атлас (аналог события updateTexture)
    pub fn set_atlas(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        tile_count: u32,
    ) -> Result<(), AtlasError> {
        self.atlas.install(
            &self.device,
            &self.queue,
            &self.layouts.atlas,
            pixels,
            width,
            height,
            tile_count,
        )
    }

    // --- Чанковые меши ---

    pub fn upload_chunk(&mut self, data: &ChunkMeshData) {
        self.chunks.upload(&self.layouts.chunk, data);
    }

    pub fn remove_chunk(&mut self, key: &ChunkKey) {
        self.chunks.remove(key);
    }

    pub fn retain_chunks(&mut self, valid_keys: &HashSet<ChunkKey>) {
        self.chunks.retain_only(valid_keys);
    }

    pub fn clear_chunks(&mut self) {
        self.chunks.clear();
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    // --- Блок-модели ---

    pub fn register_model(
        &mut self,
        name: &str,
        porous: bool,
        vertices: &[ModelVertex],
        indices: &[u32],
    ) -> ModelId {
        self.models
            .register(&self.device, name, porous, vertices, indices)
    }

    pub fn set_model_instances(&mut self, id: ModelId, instances: Vec<ModelInstance>) {
        self.models.set_instances(id, instances);
    }

    pub fn clear_model_instances(&mut self, id: ModelId) {
        self.models.clear_instances(id);
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn atlas_ready(&self) -> bool {
        self.atlas.is_ready()
    }
}
