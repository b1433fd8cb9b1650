use crate::graphics::{screen_projection_matrix, Color, FrameEncoder, GraphicsDevice};
use bytemuck::{Pod, Zeroable};
use fontdue::{Font, FontSettings};
use rect_packer::Packer;
use std::collections::HashMap;

const ATLAS_WIDTH: u32 = 1024;
const ATLAS_HEIGHT: u32 = 1024;
const ATLAS_PADDING: i32 = 1;
const MAX_GLYPH_QUADS: usize = 4096;

/// Where to align on a particular axis.
/// Y: Start = top of the text box aligned to the Y coord
///    End   = bottom of the text box aligned to the Y coord
/// X: Start = left side of the text box aligned to the X coord
///    End   = right side of the text box aligned to the X coord
/// Units are in pixels.
#[derive(Debug, Copy, Clone)]
pub enum AxisAlign {
    Start(f32),
    End(f32),
    CenteredAt(f32),
    CanvasCenter,
}

impl Default for AxisAlign {
    fn default() -> Self {
        AxisAlign::Start(0.0)
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct TextAlignment {
    pub x: AxisAlign,
    pub y: AxisAlign,
}

/// A single-line run of text with one size and color. This app only ever
/// renders short single-line labels, so there is no wrapping or rich text.
#[derive(Debug, Clone)]
pub struct StyledText<'a> {
    pub text: &'a str,
    pub size_px: f32,
    pub color: Color,
}

impl<'a> StyledText<'a> {
    pub fn new(text: &'a str, size_px: f32, color: Color) -> Self {
        Self { text, size_px, color }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlyphVertex {
    pos: [f32; 2],
    tex_coords: [f32; 2],
    color: [f32; 4],
}

#[derive(Debug, Copy, Clone)]
struct GlyphEntry {
    uv_min: [f32; 2],
    uv_max: [f32; 2],
    width: f32,
    height: f32,
    xmin: f32,
    ymin: f32,
    advance: f32,
}

/// Rasterizes glyphs with fontdue into a single-channel atlas packed with
/// rect_packer, and draws them as textured quads.
pub struct TextSystem {
    font: Font,
    packer: Packer,
    // None marks a glyph that couldn't be packed, so it isn't retried
    // every frame.
    glyph_cache: HashMap<(char, u32), Option<GlyphEntry>>,
    pending_uploads: Vec<PendingUpload>,
    vertices: Vec<GlyphVertex>,

    atlas_texture: wgpu::Texture,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,

    screen_width: u32,
    screen_height: u32,
}

struct PendingUpload {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    bitmap: Vec<u8>,
}

impl TextSystem {
    pub fn new(graphics_device: &GraphicsDevice) -> Self {
        let device = graphics_device.device();
        let (screen_width, screen_height) = graphics_device.surface_dimensions();

        let font_bytes: &[u8] = include_bytes!("resources/fonts/dejavu_sans.ttf");
        let font = Font::from_bytes(font_bytes, FontSettings::default())
            .expect("Bundled font should parse");

        let packer = Packer::new(rect_packer::Config {
            width: ATLAS_WIDTH as i32,
            height: ATLAS_HEIGHT as i32,
            border_padding: ATLAS_PADDING,
            rectangle_padding: ATLAS_PADDING,
        });

        let atlas_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Glyph atlas"),
            size: wgpu::Extent3d {
                width: ATLAS_WIDTH,
                height: ATLAS_HEIGHT,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            view_formats: &[],
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        });

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glyph vertex buffer"),
            size: (MAX_GLYPH_QUADS * 6 * std::mem::size_of::<GlyphVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Glyph uniform buffer"),
            size: std::mem::size_of::<glam::Mat4>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("TextSystem bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
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
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let texture_view = atlas_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("TextSystem bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry { binding: 0, resource: uniform_buffer.as_entire_binding() },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("TextSystem pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let draw_shader =
            GraphicsDevice::load_wgsl_shader(device, include_str!("shaders/wgsl/glyph.wgsl"));

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("TextSystem render pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &draw_shader,
                entry_point: "main_vs",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GlyphVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x2, // pos
                        1 => Float32x2, // tex_coords
                        2 => Float32x4, // color
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

        Self {
            font,
            packer,
            glyph_cache: HashMap::new(),
            pending_uploads: Vec::new(),
            vertices: Vec::new(),
            atlas_texture,
            vertex_buffer,
            uniform_buffer,
            bind_group,
            pipeline,
            screen_width,
            screen_height,
        }
    }

    pub fn resize(&mut self, screen_width: u32, screen_height: u32) {
        self.screen_width = screen_width;
        self.screen_height = screen_height;
    }

    pub fn begin(&mut self) -> TextRecorder {
        self.vertices.clear();

        TextRecorder { text_system: self }
    }

    /// Width of `text` in pixels when laid out on a single line.
    pub fn measure_width(&mut self, text: &StyledText) -> f32 {
        text.text
            .chars()
            .filter_map(|c| self.glyph(c, text.size_px))
            .map(|entry| entry.advance)
            .sum()
    }

    fn line_height(size_px: f32) -> f32 {
        size_px * 1.2
    }

    fn glyph(&mut self, character: char, size_px: f32) -> Option<GlyphEntry> {
        let key = (character, size_px.to_bits());

        if let Some(cached) = self.glyph_cache.get(&key) {
            return *cached;
        }

        let (metrics, bitmap) = self.font.rasterize(character, size_px);

        let entry = if metrics.width == 0 || metrics.height == 0 {
            // Whitespace still advances the pen, it just has no quad.
            Some(GlyphEntry {
                uv_min: [0.0, 0.0],
                uv_max: [0.0, 0.0],
                width: 0.0,
                height: 0.0,
                xmin: metrics.xmin as f32,
                ymin: metrics.ymin as f32,
                advance: metrics.advance_width,
            })
        } else if let Some(rect) = self.packer.pack(metrics.width as i32, metrics.height as i32, false)
        {
            self.pending_uploads.push(PendingUpload {
                x: rect.x as u32,
                y: rect.y as u32,
                width: metrics.width as u32,
                height: metrics.height as u32,
                bitmap,
            });

            Some(GlyphEntry {
                uv_min: [
                    rect.x as f32 / ATLAS_WIDTH as f32,
                    rect.y as f32 / ATLAS_HEIGHT as f32,
                ],
                uv_max: [
                    (rect.x as f32 + metrics.width as f32) / ATLAS_WIDTH as f32,
                    (rect.y as f32 + metrics.height as f32) / ATLAS_HEIGHT as f32,
                ],
                width: metrics.width as f32,
                height: metrics.height as f32,
                xmin: metrics.xmin as f32,
                ymin: metrics.ymin as f32,
                advance: metrics.advance_width,
            })
        } else {
            tracing::warn!(character = %character, size_px, "glyph atlas is full");
            None
        };

        self.glyph_cache.insert(key, entry);
        entry
    }

    fn add_glyph_quad(&mut self, entry: &GlyphEntry, x: f32, y: f32, color: [f32; 4]) {
        if self.vertices.len() + 6 > MAX_GLYPH_QUADS * 6 {
            tracing::warn!("glyph quad budget exhausted, dropping glyph");
            return;
        }

        let left = x;
        let top = y;
        let right = x + entry.width;
        let bottom = y + entry.height;

        let [uv_left, uv_top] = entry.uv_min;
        let [uv_right, uv_bottom] = entry.uv_max;

        for [pos, uv] in [
            [[left, top], [uv_left, uv_top]],
            [[left, bottom], [uv_left, uv_bottom]],
            [[right, bottom], [uv_right, uv_bottom]],
            [[right, bottom], [uv_right, uv_bottom]],
            [[right, top], [uv_right, uv_top]],
            [[left, top], [uv_left, uv_top]],
        ] {
            self.vertices.push(GlyphVertex { pos, tex_coords: uv, color });
        }
    }
}

pub struct TextRecorder<'a> {
    text_system: &'a mut TextSystem,
}

impl TextRecorder<'_> {
    /// Records one single-line label at the given alignment anchors.
    pub fn draw(&mut self, alignment: TextAlignment, text: &StyledText) {
        let width = self.text_system.measure_width(text);
        let height = TextSystem::line_height(text.size_px);

        let x = match alignment.x {
            AxisAlign::Start(start_x) => start_x,
            AxisAlign::End(end_x) => end_x - width,
            AxisAlign::CenteredAt(center_x) => center_x - width / 2.0,
            AxisAlign::CanvasCenter => (self.text_system.screen_width as f32 - width) / 2.0,
        };

        let y = match alignment.y {
            AxisAlign::Start(start_y) => start_y,
            AxisAlign::End(end_y) => end_y - height,
            AxisAlign::CenteredAt(center_y) => center_y - height / 2.0,
            AxisAlign::CanvasCenter => (self.text_system.screen_height as f32 - height) / 2.0,
        };

        // Approximate the ascent with the em size; DejaVu's ascender is a
        // whisker above it, which is fine for label placement.
        let baseline = y + text.size_px;
        let color = text.color.to_array();

        let mut pen_x = x;
        for character in text.text.chars() {
            let Some(entry) = self.text_system.glyph(character, text.size_px) else {
                continue;
            };

            if entry.width > 0.0 {
                let glyph_x = pen_x + entry.xmin;
                let glyph_y = baseline - (entry.height + entry.ymin);
                self.text_system.add_glyph_quad(&entry, glyph_x, glyph_y, color);
            }

            pen_x += entry.advance;
        }
    }

    pub fn end(self, frame_encoder: &mut FrameEncoder) {
        let (width, height) = frame_encoder.surface_dimensions();
        let queue = frame_encoder.queue();

        for upload in self.text_system.pending_uploads.drain(..) {
            queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &self.text_system.atlas_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d { x: upload.x, y: upload.y, z: 0 },
                    aspect: wgpu::TextureAspect::All,
                },
                &upload.bitmap,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(upload.width),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width: upload.width,
                    height: upload.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let num_vertices = self.text_system.vertices.len();

        queue.write_buffer(
            &self.text_system.vertex_buffer,
            0,
            bytemuck::cast_slice(self.text_system.vertices.as_slice()),
        );

        let projection = screen_projection_matrix(width, height);
        queue.write_buffer(
            &self.text_system.uniform_buffer,
            0,
            bytemuck::cast_slice(projection.as_ref()),
        );

        if num_vertices == 0 {
            return;
        }

        let encoder = &mut frame_encoder.encoder;

        encoder.push_debug_group("Text system");
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

            render_pass.set_pipeline(&self.text_system.pipeline);
            render_pass.set_bind_group(0, &self.text_system.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.text_system.vertex_buffer.slice(..));
            render_pass.draw(0..num_vertices as u32, 0..1);
        }
        encoder.pop_debug_group();
    }
}
