// ============================================
// Porous Pass - Полупрозрачный проход
// ============================================
// Кодируется строго после solid-прохода: блендится по готовой
// непрозрачной картинке. Цвет и depth загружаются (LoadOp::Load),
// depth не пишется, тест остаётся Greater.

use crate::mesh::ChunkMeshStore;
use crate::models::ModelSet;
use crate::render::frustum::is_chunk_visible;
use crate::render::pipelines::Pipelines;

pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    depth_texture: &wgpu::TextureView,
    cached_view_proj: &[[f32; 4]; 4],
    pipelines: &Pipelines,
    scene_bind_group: &wgpu::BindGroup,
    atlas_bind_group: &wgpu::BindGroup,
    chunks: &ChunkMeshStore,
    models: &ModelSet,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Porous Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Load, // Не очищаем, рисуем поверх
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_texture,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Load, // Тестируем против solid-глубины
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    // Porous-геометрия чанков
    render_pass.set_pipeline(&pipelines.porous);
    render_pass.set_bind_group(0, scene_bind_group, &[]);
    render_pass.set_bind_group(1, atlas_bind_group, &[]);

    for gpu_chunk in chunks.iter() {
        let Some(porous) = &gpu_chunk.porous else { continue };
        if !is_chunk_visible(cached_view_proj, &gpu_chunk.key) {
            continue;
        }

        render_pass.set_bind_group(2, &gpu_chunk.offset_bind_group, &[]);
        render_pass.set_vertex_buffer(0, porous.vertex_buffer.slice(..));
        render_pass.set_index_buffer(porous.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..porous.index_count, 0, 0..1);
    }

    // Porous блок-модели (растительность)
    if models.has_porous_instances() {
        render_pass.set_pipeline(&pipelines.model_porous);
        render_pass.set_bind_group(0, scene_bind_group, &[]);
        render_pass.set_bind_group(1, atlas_bind_group, &[]);
        models.draw_porous(&mut render_pass);
    }
}
