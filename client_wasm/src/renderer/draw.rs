use wgpu::*;

use super::{RenderError, Renderer};
use crate::mesh::Mesh;
use crate::scene::Scene;

pub fn draw_frame(renderer: &mut Renderer, scene: &Scene) -> Result<(), RenderError> {
    let output = match renderer.surface.get_current_texture() {
        Ok(output) => output,
        Err(SurfaceError::Lost | SurfaceError::Outdated) => {
            // Skip this frame; the next one draws on the fresh surface
            renderer
                .surface
                .configure(&renderer.device, &renderer.surface_config);
            return Ok(());
        }
        Err(SurfaceError::Timeout) => return Ok(()),
        Err(e) => return Err(RenderError::Frame(format!("{:?}", e))),
    };
    let view = output.texture.create_view(&TextureViewDescriptor::default());

    // Rects first, circles after, in one buffer
    let mut instances = Vec::with_capacity(scene.instance_count());
    instances.extend_from_slice(&scene.rects);
    instances.extend_from_slice(&scene.circles);
    renderer
        .instances
        .write(&renderer.device, &renderer.queue, &instances);

    let rect_range = 0..scene.rects.len() as u32;
    let circle_range = rect_range.end..instances.len() as u32;

    let mut encoder = renderer
        .device
        .create_command_encoder(&CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
    {
        let mut pass = encoder.begin_render_pass(&RenderPassDescriptor {
            label: Some("Main Pass"),
            color_attachments: &[Some(RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: Operations {
                    load: LoadOp::Clear(Color::BLACK),
                    store: StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&renderer.pipeline);
        pass.set_bind_group(0, &renderer.camera_bind_group, &[]);
        pass.set_vertex_buffer(1, renderer.instances.buffer.slice(..));

        draw_mesh(&mut pass, &renderer.quad, rect_range);
        draw_mesh(&mut pass, &renderer.circle, circle_range);
    }

    renderer.queue.submit(std::iter::once(encoder.finish()));
    output.present();

    Ok(())
}

fn draw_mesh(pass: &mut RenderPass<'_>, mesh: &Mesh, instances: std::ops::Range<u32>) {
    if instances.is_empty() {
        return;
    }
    pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
    pass.set_index_buffer(mesh.index_buffer.slice(..), IndexFormat::Uint16);
    pass.draw_indexed(0..mesh.index_count, 0, instances);
}
