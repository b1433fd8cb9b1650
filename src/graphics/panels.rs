use crate::graphics::{screen_projection_matrix, Color, FrameEncoder, GraphicsDevice};
use crate::ui::Rect;
use bytemuck::{Pod, Zeroable};

const MAX_PANEL_QUADS: usize = 256;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct PanelVertex {
    pos: [f32; 2],
    color: [f32; 4],
}

/// Draws solid-color rectangles in screen space: the drawing canvas
/// background and border, and the action button.
pub struct PanelRenderer {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    vertices: Vec<PanelVertex>,
}

impl PanelRenderer {
    pub fn new(graphics_device: &GraphicsDevice) -> Self {
        let device = graphics_device.device();

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Panel vertex buffer"),
            size: (MAX_PANEL_QUADS * 6 * std::mem::size_of::<PanelVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Panel uniform buffer"),
            size: std::mem::size_of::<glam::Mat4>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("PanelRenderer bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<glam::Mat4>() as u64
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("PanelRenderer bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("PanelRenderer pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let draw_shader =
            GraphicsDevice::load_wgsl_shader(device, include_str!("shaders/wgsl/panel.wgsl"));

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("PanelRenderer render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &draw_shader,
                entry_point: "main_vs",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PanelVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x2, // pos
                        1 => Float32x4, // color
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &draw_shader,
                entry_point: "main_fs",
                targets: &[Some(wgpu::ColorTargetState {
                    format: graphics_device.surface_texture_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });

        Self { pipeline, vertex_buffer, uniform_buffer, bind_group, vertices: Vec::new() }
    }

    pub fn begin(&mut self) -> PanelRecorder {
        self.vertices.clear();

        PanelRecorder { renderer: self }
    }
}

pub struct PanelRecorder<'a> {
    renderer: &'a mut PanelRenderer,
}

impl PanelRecorder<'_> {
    pub fn draw_panel(&mut self, rect: Rect, color: Color) {
        if self.renderer.vertices.len() + 6 > MAX_PANEL_QUADS * 6 {
            tracing::warn!("panel quad budget exhausted, dropping panel");
            return;
        }

        let color = color.to_array();
        let (left, top) = (rect.min.x, rect.min.y);
        let (right, bottom) = (rect.max.x, rect.max.y);

        for pos in [
            [left, top],
            [left, bottom],
            [right, bottom],
            [right, bottom],
            [right, top],
            [left, top],
        ] {
            self.renderer.vertices.push(PanelVertex { pos, color });
        }
    }

    /// Draws the outline of `rect` as four thin panels of `thickness` pixels,
    /// outset from the rect edge.
    pub fn draw_border(&mut self, rect: Rect, thickness: f32, color: Color) {
        let Rect { min, max } = rect;

        let top = Rect::from_corners(min.x - thickness, min.y - thickness, max.x + thickness, min.y);
        let bottom =
            Rect::from_corners(min.x - thickness, max.y, max.x + thickness, max.y + thickness);
        let left = Rect::from_corners(min.x - thickness, min.y, min.x, max.y);
        let right = Rect::from_corners(max.x, min.y, max.x + thickness, max.y);

        for side in [top, bottom, left, right] {
            self.draw_panel(side, color);
        }
    }

    pub fn end(self, frame_encoder: &mut FrameEncoder) {
        let (width, height) = frame_encoder.surface_dimensions();
        let queue = frame_encoder.queue();

        let num_vertices = self.renderer.vertices.len();

        queue.write_buffer(
            &self.renderer.vertex_buffer,
            0,
            bytemuck::cast_slice(self.renderer.vertices.as_slice()),
        );

        let projection = screen_projection_matrix(width, height);
        queue.write_buffer(
            &self.renderer.uniform_buffer,
            0,
            bytemuck::cast_slice(projection.as_ref()),
        );

        if num_vertices == 0 {
            return;
        }

        let encoder = &mut frame_encoder.encoder;

        encoder.push_debug_group("Panel renderer");
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_encoder.backbuffer_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.renderer.pipeline);
            render_pass.set_bind_group(0, &self.renderer.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.renderer.vertex_buffer.slice(..));
            render_pass.draw(0..num_vertices as u32, 0..1);
        }
        encoder.pop_debug_group();
    }
}
