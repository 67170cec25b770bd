use crate::program::{GpuProgram, RenderError, validated};
use bytemuck::{Pod, Zeroable};
use glyphometer_digits::DigitSequence;
use glyphometer_render::{RenderView, ShapeSet, SlotLayout};
use glyphometer_shader::LinkedProgram;
use wgpu::util::DeviceExt;

const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct LineUniforms {
    color: [f32; 4],
    aspect: f32,
    frame: i32,
    _padding: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SlotInstance {
    model: [[f32; 4]; 4],
}

/// Pixel size of the off-screen canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
        }
    }
}

impl CanvasSize {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Static vertex and index buffers of one glyph shape.
struct ShapeBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

/// wgpu glyph renderer.
pub struct WgpuRenderer {
    line_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    canvas_bind_group: wgpu::BindGroup,
    canvas_view: wgpu::TextureView,
    canvas_size: CanvasSize,
    shapes: Vec<ShapeBuffers>,
    instance_buffer: wgpu::Buffer,
    slot_count: u32,
}

impl WgpuRenderer {
    /// Upload shapes and slot transforms and build both pipelines.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        line: &LinkedProgram,
        blit: &LinkedProgram,
        shapes: &ShapeSet,
        slot_count: usize,
        canvas_size: CanvasSize,
    ) -> Result<Self, RenderError> {
        let line_program = GpuProgram::new(device, line)?;
        let blit_program = GpuProgram::new(device, blit)?;
        let layout = SlotLayout::new(slot_count, canvas_size.aspect());

        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("line_uniform_buffer"),
            contents: bytemuck::bytes_of(&LineUniforms {
                color: RenderView::default().line_color,
                aspect: layout.aspect(),
                frame: 0,
                _padding: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("line_uniform_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("line_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        // Line pipeline, drawing into the canvas
        let line_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let line_buffers = [
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &wgpu::vertex_attr_array![0 => Float32x3],
            },
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<SlotInstance>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &wgpu::vertex_attr_array![
                    1 => Float32x4,
                    2 => Float32x4,
                    3 => Float32x4,
                    4 => Float32x4,
                ],
            },
        ];
        let line_targets = [Some(wgpu::ColorTargetState {
            format: CANVAS_FORMAT,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let line_pipeline = validated(device, "line pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("line_pipeline"),
                layout: Some(&line_layout),
                vertex: line_program.vertex_state(&line_buffers),
                fragment: Some(line_program.fragment_state(&line_targets)),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::LineList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        // Canvas target and sampler
        let canvas = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("canvas_texture"),
            size: wgpu::Extent3d {
                width: canvas_size.width.max(1),
                height: canvas_size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: CANVAS_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let canvas_view = canvas.create_view(&Default::default());
        let canvas_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("canvas_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let canvas_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("canvas_layout"),
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
        let canvas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("canvas_bind_group"),
            layout: &canvas_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&canvas_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&canvas_sampler),
                },
            ],
        });

        // Blit pipeline, compositing the canvas onto the surface
        let blit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit_pipeline_layout"),
            bind_group_layouts: &[&canvas_layout],
            push_constant_ranges: &[],
        });
        let blit_targets = [Some(wgpu::ColorTargetState {
            format: surface_format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];
        let blit_pipeline = validated(device, "blit pipeline", || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("blit_pipeline"),
                layout: Some(&blit_layout),
                vertex: blit_program.vertex_state(&[]),
                fragment: Some(blit_program.fragment_state(&blit_targets)),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        })?;

        // Shape meshes
        let shape_buffers = shapes
            .iter()
            .map(|shape| ShapeBuffers {
                vertex: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertex_buffer", shape.name)),
                    contents: bytemuck::cast_slice(&shape.positions),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_index_buffer", shape.name)),
                    contents: bytemuck::cast_slice(&shape.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: shape.index_count(),
            })
            .collect();

        // Slot transforms never change, so the instance buffer is static.
        let mut instances: Vec<SlotInstance> = layout
            .columns()
            .into_iter()
            .map(|model| SlotInstance { model })
            .collect();
        if instances.is_empty() {
            instances.push(SlotInstance::zeroed());
        }
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("slot_instance_buffer"),
            contents: bytemuck::cast_slice(&instances),
            usage: wgpu::BufferUsages::VERTEX,
        });

        tracing::info!(
            shapes = shapes.len(),
            slots = slot_count,
            canvas_width = canvas_size.width,
            canvas_height = canvas_size.height,
            "glyph renderer ready"
        );

        Ok(Self {
            line_pipeline,
            blit_pipeline,
            uniform_buffer,
            uniform_bind_group,
            canvas_bind_group,
            canvas_view,
            canvas_size,
            shapes: shape_buffers,
            instance_buffer,
            slot_count: slot_count as u32,
        })
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    /// Render one frame: glyphs into the canvas, then the canvas onto `target`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        digits: &DigitSequence,
        view: &RenderView,
    ) {
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&LineUniforms {
                color: view.line_color,
                aspect: self.canvas_size.aspect(),
                frame: (view.frame % i32::MAX as u64) as i32,
                _padding: [0.0; 2],
            }),
        );

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = view.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("canvas_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.canvas_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.line_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            for (slot, digit) in digits.iter().enumerate().take(self.slot_count as usize) {
                let Some(shape) = self.shape_for(digit) else {
                    continue;
                };
                let slot = slot as u32;
                pass.set_vertex_buffer(0, shape.vertex.slice(..));
                pass.set_index_buffer(shape.index.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..shape.index_count, 0, slot..slot + 1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blit_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });
            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &self.canvas_bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn shape_for(&self, digit: i32) -> Option<&ShapeBuffers> {
        let last = self.shapes.len().checked_sub(1)?;
        self.shapes.get((digit.max(0) as usize).min(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_is_std140_sized() {
        assert_eq!(std::mem::size_of::<LineUniforms>(), 32);
        assert_eq!(std::mem::size_of::<SlotInstance>(), 64);
    }

    #[test]
    fn canvas_aspect() {
        assert!((CanvasSize::default().aspect() - 4.0 / 3.0).abs() < 1e-6);
        let degenerate = CanvasSize {
            width: 10,
            height: 0,
        };
        assert_eq!(degenerate.aspect(), 10.0);
    }
}
