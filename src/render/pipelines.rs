// ============================================
// Pipelines - Пайплайны и layout'ы bind group
// ============================================
// Таблица состояний двух материалов:
//   solid:  blend REPLACE, запись depth включена
//   porous: premultiplied alpha, запись depth выключена
// Оба сравнивают depth как Greater (Reversed-Z).

use crate::mesh::ChunkVertex;
use crate::models::{ModelInstance, ModelVertex};

use super::shaders::ShaderSources;

pub struct BindGroupLayouts {
    pub scene: wgpu::BindGroupLayout,
    pub atlas: wgpu::BindGroupLayout,
    pub chunk: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let scene = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let atlas = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Atlas Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let chunk = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Chunk Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        Self { scene, atlas, chunk }
    }
}

pub struct Pipelines {
    pub solid: wgpu::RenderPipeline,
    pub porous: wgpu::RenderPipeline,
    pub model_solid: wgpu::RenderPipeline,
    pub model_porous: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        layouts: &BindGroupLayouts,
        sources: &ShaderSources,
    ) -> Self {
        let solid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Solid Shader"),
            source: wgpu::ShaderSource::Wgsl(sources.solid.as_str().into()),
        });

        let porous_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Porous Shader"),
            source: wgpu::ShaderSource::Wgsl(sources.porous.as_str().into()),
        });

        let model_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(sources.model.as_str().into()),
        });

        let chunk_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Chunk Pipeline Layout"),
            bind_group_layouts: &[&layouts.scene, &layouts.atlas, &layouts.chunk],
            push_constant_ranges: &[],
        });

        // Модели несут мировое смещение в инстансе, chunk uniform им не нужен
        let model_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model Pipeline Layout"),
            bind_group_layouts: &[&layouts.scene, &layouts.atlas],
            push_constant_ranges: &[],
        });

        let solid = build_pipeline(
            device,
            "Solid Pipeline",
            surface_format,
            &chunk_layout,
            &solid_shader,
            &[ChunkVertex::desc()],
            wgpu::BlendState::REPLACE,
            true,
        );

        let porous = build_pipeline(
            device,
            "Porous Pipeline",
            surface_format,
            &chunk_layout,
            &porous_shader,
            &[ChunkVertex::desc()],
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            false,
        );

        let model_solid = build_pipeline(
            device,
            "Model Solid Pipeline",
            surface_format,
            &model_layout,
            &model_shader,
            &[ModelVertex::desc(), ModelInstance::desc()],
            wgpu::BlendState::REPLACE,
            true,
        );

        let model_porous = build_pipeline(
            device,
            "Model Porous Pipeline",
            surface_format,
            &model_layout,
            &model_shader,
            &[ModelVertex::desc(), ModelInstance::desc()],
            wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            false,
        );

        Self {
            solid,
            porous,
            model_solid,
            model_porous,
        }
    }
}

fn build_pipeline(
    device: &wgpu::Device,
    label: &str,
    surface_format: wgpu::TextureFormat,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    blend: wgpu::BlendState,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth32Float,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Greater, // Reversed-Z
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}
