// ============================================
// Solid Pass - Непрозрачный проход
// ============================================
// Первый проход кадра: очищает цвет и depth, рисует solid-геометрию
// чанков и solid-модели. Depth пишется, blend REPLACE.

use crate::mesh::ChunkMeshStore;
use crate::models::ModelSet;
use crate::render::frustum::is_chunk_visible;
use crate::render::pipelines::Pipelines;

pub fn render(
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    depth_texture: &wgpu::TextureView,
    sky_color: [f32; 3],
    cached_view_proj: &[[f32; 4]; 4],
    pipelines: &Pipelines,
    scene_bind_group: &wgpu::BindGroup,
    atlas_bind_group: &wgpu::BindGroup,
    chunks: &ChunkMeshStore,
    models: &ModelSet,
) {
    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("Solid Pass"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color {
                    r: sky_color[0] as f64,
                    g: sky_color[1] as f64,
                    b: sky_color[2] as f64,
                    a: 1.0,
                }),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
            view: depth_texture,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0.0), // Reversed-Z: clear to 0 instead of 1
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        }),
        timestamp_writes: None,
        occlusion_query_set: None,
    });

    // Solid-геометрия чанков
    render_pass.set_pipeline(&pipelines.solid);
    render_pass.set_bind_group(0, scene_bind_group, &[]);
    render_pass.set_bind_group(1, atlas_bind_group, &[]);

    for gpu_chunk in chunks.iter() {
        let Some(solid) = &gpu_chunk.solid else { continue };
        if !is_chunk_visible(cached_view_proj, &gpu_chunk.key) {
            continue;
        }

        render_pass.set_bind_group(2, &gpu_chunk.offset_bind_group, &[]);
        render_pass.set_vertex_buffer(0, solid.vertex_buffer.slice(..));
        render_pass.set_index_buffer(solid.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..solid.index_count, 0, 0..1);
    }

    // Solid блок-модели
    if models.has_solid_instances() {
        render_pass.set_pipeline(&pipelines.model_solid);
        render_pass.set_bind_group(0, scene_bind_group, &[]);
        render_pass.set_bind_group(1, atlas_bind_group, &[]);
        models.draw_solid(&mut render_pass);
    }
}
