use crate::graphics::{screen_projection_matrix, Color, FrameEncoder, GraphicsDevice};
use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use wgpu::util::DeviceExt;

/// Largest number of stroke points uploaded per frame. Recording past this
/// silently drops the excess (with a log) instead of overflowing the buffer.
const MAX_STROKE_POINTS: usize = 40_000;
const CIRCLE_RESOLUTION: usize = 30;

/// One point of a rendered polyline: XY position, half-open width, and color.
/// Consecutive points of a strip become instanced round segments.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct StrokePoint {
    pos: [f32; 3],
    color: [f32; 4],
}

impl StrokePoint {
    pub fn new(pos: Vec2, width: f32, color: Color) -> Self {
        Self { pos: [pos.x, pos.y, width], color: color.to_array() }
    }
}

struct Buffers {
    vertex_uniform: wgpu::Buffer,
    segment_geometry: wgpu::Buffer,
    segment_geometry_len: usize,
    segment_instances: wgpu::Buffer,
}

struct BindGroups {
    vertex_uniform: wgpu::BindGroup,
}

/// Renders strokes as instanced round line strips: a shared template quad
/// plus cap fans, positioned per segment in the vertex shader. Used for the
/// player's freehand strokes and for the overlay line art.
pub struct StrokeRenderer {
    pipeline: wgpu::RenderPipeline,
    buffers: Buffers,
    bind_groups: BindGroups,
    strip_points: Vec<StrokePoint>,
    strip_lengths: Vec<usize>,
}

impl StrokeRenderer {
    pub fn new(graphics_device: &GraphicsDevice) -> Self {
        let pipeline = Self::build_pipeline(graphics_device);
        let buffers = Self::build_buffers(graphics_device);
        let bind_groups = Self::build_bind_groups(graphics_device, &pipeline, &buffers);

        Self { pipeline, buffers, bind_groups, strip_points: Vec::new(), strip_lengths: Vec::new() }
    }

    pub fn begin(&mut self) -> StrokeRecorder {
        self.strip_points.clear();
        self.strip_lengths.clear();

        StrokeRecorder { renderer: self }
    }

    fn build_pipeline(graphics_device: &GraphicsDevice) -> wgpu::RenderPipeline {
        let device = graphics_device.device();

        let draw_shader = GraphicsDevice::load_wgsl_shader(
            device,
            include_str!("shaders/wgsl/round_line_strip.wgsl"),
        );

        let vertex_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: None,
            });

        let render_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Stroke renderer"),
                bind_group_layouts: &[&vertex_bind_group_layout],
                push_constant_ranges: &[],
            });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &draw_shader,
                entry_point: "main_vs",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<TemplateVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3, // XY of the template vertex, Z selects the endpoint.
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        // The stride is one StrokePoint here intentionally:
                        // instance N reads points N and N + 1 as its endpoints.
                        array_stride: std::mem::size_of::<StrokePoint>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            1 => Float32x3, // Point A (XY + width)
                            2 => Float32x4, // Segment color
                            3 => Float32x3, // Point B (XY + width)
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &draw_shader,
                entry_point: "main_fs",
                targets: &[Some(wgpu::ColorTargetState {
                    format: graphics_device.surface_config().format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..wgpu::PrimitiveState::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    fn build_bind_groups(
        graphics_device: &GraphicsDevice,
        render_pipeline: &wgpu::RenderPipeline,
        buffers: &Buffers,
    ) -> BindGroups {
        let device = graphics_device.device();

        let vertex_uniform = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &render_pipeline.get_bind_group_layout(0),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffers.vertex_uniform.as_entire_binding(),
            }],
            label: None,
        });

        BindGroups { vertex_uniform }
    }

    fn build_buffers(graphics_device: &GraphicsDevice) -> Buffers {
        let (width, height) = graphics_device.surface_dimensions();
        let device = graphics_device.device();

        let projection = screen_projection_matrix(width, height);
        let vertex_uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Stroke renderer uniform buffer"),
            contents: bytemuck::cast_slice(projection.as_ref()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Body quad: x = 0, y spans the width, z picks the endpoint.
        let mut template_vertices = vec![
            TemplateVertex { pos: [0.0, -0.5, 0.0] },
            TemplateVertex { pos: [0.0, 0.5, 0.0] },
            TemplateVertex { pos: [0.0, 0.5, 1.0] },
            TemplateVertex { pos: [0.0, -0.5, 0.0] },
            TemplateVertex { pos: [0.0, 0.5, 1.0] },
            TemplateVertex { pos: [0.0, -0.5, 1.0] },
        ];

        // Cap fan around endpoint A.
        for i in 0..CIRCLE_RESOLUTION {
            let frac_1 = (std::f32::consts::PI / 2.0)
                + (i as f32 / CIRCLE_RESOLUTION as f32) * std::f32::consts::PI;
            let frac_2 = (std::f32::consts::PI / 2.0)
                + ((i + 1) as f32 / CIRCLE_RESOLUTION as f32) * std::f32::consts::PI;

            template_vertices.push(TemplateVertex { pos: [0.0, 0.0, 0.0] });
            template_vertices
                .push(TemplateVertex { pos: [0.5 * frac_2.cos(), 0.5 * frac_2.sin(), 0.0] });
            template_vertices
                .push(TemplateVertex { pos: [0.5 * frac_1.cos(), 0.5 * frac_1.sin(), 0.0] });
        }

        // Cap fan around endpoint B.
        for i in 0..CIRCLE_RESOLUTION {
            let frac_1 = (3.0 * std::f32::consts::PI / 2.0)
                + (i as f32 / CIRCLE_RESOLUTION as f32) * std::f32::consts::PI;
            let frac_2 = (3.0 * std::f32::consts::PI / 2.0)
                + ((i + 1) as f32 / CIRCLE_RESOLUTION as f32) * std::f32::consts::PI;

            template_vertices.push(TemplateVertex { pos: [0.0, 0.0, 1.0] });
            template_vertices
                .push(TemplateVertex { pos: [0.5 * frac_2.cos(), 0.5 * frac_2.sin(), 1.0] });
            template_vertices
                .push(TemplateVertex { pos: [0.5 * frac_1.cos(), 0.5 * frac_1.sin(), 1.0] });
        }

        let segment_geometry = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Stroke segment geometry buffer"),
            contents: bytemuck::cast_slice(&template_vertices),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let segment_instances = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Stroke instance buffer"),
            size: (MAX_STROKE_POINTS * std::mem::size_of::<StrokePoint>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Buffers {
            vertex_uniform,
            segment_geometry,
            segment_geometry_len: template_vertices.len(),
            segment_instances,
        }
    }
}

pub struct StrokeRecorder<'a> {
    renderer: &'a mut StrokeRenderer,
}

impl StrokeRecorder<'_> {
    /// Records one polyline with round joins and caps. Strips with fewer than
    /// two points draw nothing (a just-started stroke has no segment yet).
    pub fn draw_round_line_strip(&mut self, points: &[StrokePoint]) {
        if points.is_empty() {
            return;
        }

        if self.renderer.strip_points.len() + points.len() > MAX_STROKE_POINTS {
            tracing::warn!(
                dropped = points.len(),
                "stroke point budget exhausted, dropping strip"
            );
            return;
        }

        self.renderer.strip_points.extend_from_slice(points);
        self.renderer.strip_lengths.push(points.len());
    }

    /// Uploads the recorded strips and draws them, clipped to `scissor`
    /// (pixel rect) when given.
    pub fn end(self, frame_encoder: &mut FrameEncoder, scissor: Option<(u32, u32, u32, u32)>) {
        let (width, height) = frame_encoder.surface_dimensions();

        let queue = frame_encoder.queue();

        queue.write_buffer(
            &self.renderer.buffers.segment_instances,
            0,
            bytemuck::cast_slice(&self.renderer.strip_points),
        );

        let projection = screen_projection_matrix(width, height);
        queue.write_buffer(
            &self.renderer.buffers.vertex_uniform,
            0,
            bytemuck::cast_slice(projection.as_ref()),
        );

        // Clamp the scissor to the surface up front; a degenerate rect means
        // nothing would be visible anyway.
        let scissor = scissor.map(|(x, y, w, h)| {
            let x = x.min(width);
            let y = y.min(height);
            (x, y, w.min(width - x), h.min(height - y))
        });
        if let Some((_, _, w, h)) = scissor {
            if w == 0 || h == 0 {
                return;
            }
        }

        let encoder = &mut frame_encoder.encoder;

        encoder.push_debug_group("Stroke renderer");
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

            if let Some((x, y, w, h)) = scissor {
                render_pass.set_scissor_rect(x, y, w, h);
            }

            render_pass.set_pipeline(&self.renderer.pipeline);
            render_pass.set_vertex_buffer(0, self.renderer.buffers.segment_geometry.slice(..));
            render_pass.set_vertex_buffer(1, self.renderer.buffers.segment_instances.slice(..));
            render_pass.set_bind_group(0, &self.renderer.bind_groups.vertex_uniform, &[]);

            let mut offset = 0usize;
            let vertex_count = self.renderer.buffers.segment_geometry_len as u32;

            for strip_len in &self.renderer.strip_lengths {
                // N points make N - 1 segments.
                let range = (offset as u32)..(offset + strip_len - 1) as u32;
                offset += strip_len;
                render_pass.draw(0..vertex_count, range);
            }
        }
        encoder.pop_debug_group();
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TemplateVertex {
    /// XY position of the template vertex, with Z indicating:
    /// 0: anchored to endpoint A of the segment.
    /// 1: anchored to endpoint B of the segment.
    pos: [f32; 3],
}
