//! GUI overlay painting.
//!
//! The frame loop hands each frame's tessellated GUI output to an
//! [`OverlayPainter`]; the painter emits it onto the current surface texture.

/// GPU handles and target for one overlay paint.
pub struct PaintTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub view: &'a wgpu::TextureView,
    pub size_in_pixels: [u32; 2],
}

/// One frame of GUI output: clipped draw batches plus texture updates.
pub struct OverlayBatch {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Emits a batch of clipped GUI draw commands to the graphics context.
pub trait OverlayPainter {
    fn paint(&mut self, target: &PaintTarget<'_>, batch: &OverlayBatch);
}

/// Painter backed by `egui-wgpu`.
pub struct EguiWgpuPainter {
    renderer: egui_wgpu::Renderer,
}

impl EguiWgpuPainter {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        Self {
            renderer: egui_wgpu::Renderer::new(device, surface_format, None, 1, false),
        }
    }
}

impl OverlayPainter for EguiWgpuPainter {
    fn paint(&mut self, target: &PaintTarget<'_>, batch: &OverlayBatch) {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: target.size_in_pixels,
            pixels_per_point: batch.pixels_per_point,
        };

        for (id, image_delta) in &batch.textures_delta.set {
            self.renderer
                .update_texture(target.device, target.queue, *id, image_delta);
        }
        let mut encoder = target
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        let callbacks = self.renderer.update_buffers(
            target.device,
            target.queue,
            &mut encoder,
            &batch.primitives,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.renderer
                .render(&mut pass, &batch.primitives, &screen_descriptor);
        }
        target.queue.submit(
            callbacks
                .into_iter()
                .chain(std::iter::once(encoder.finish())),
        );
        for id in &batch.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
