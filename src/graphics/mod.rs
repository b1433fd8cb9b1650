use glam::Mat4;
use wgpu::{
    Backends, CommandEncoder, CompositeAlphaMode, Device, Instance, InstanceDescriptor, Queue,
    Surface, SurfaceConfiguration, SurfaceTexture, TextureFormat, TextureView,
};
use winit::{dpi::PhysicalSize, window::Window};

mod panels;
mod strokes;
pub mod text;

pub use panels::*;
pub use strokes::*;

/// 8-bit RGBA display color shared by strokes, panels, and text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self { red, green, blue, alpha }
    }

    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn to_array(self) -> [f32; 4] {
        [
            self.red as f32 / 255.0,
            self.green as f32 / 255.0,
            self.blue as f32 / 255.0,
            self.alpha as f32 / 255.0,
        ]
    }

    pub fn to_wgpu(self) -> wgpu::Color {
        let [r, g, b, a] = self.to_array();
        wgpu::Color { r: r as f64, g: g as f64, b: b as f64, a: a as f64 }
    }
}

pub struct GraphicsDevice {
    device: Device,
    queue: Queue,
    surface: Surface,
    surface_config: SurfaceConfiguration,
}

impl GraphicsDevice {
    pub async fn new(window: &Window) -> Self {
        let size = window.inner_size();

        // PRIMARY: All the apis that wgpu offers first tier of support for (Vulkan + Metal + DX12 + Browser WebGPU).
        let instance =
            Instance::new(InstanceDescriptor { backends: Backends::PRIMARY, ..Default::default() });
        let surface =
            unsafe { instance.create_surface(window) }.expect("Failed to create a surface");
        let swapchain_format = wgpu::TextureFormat::Bgra8Unorm;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                // Prefer low power when on battery, high performance when on mains.
                power_preference: wgpu::PowerPreference::default(),
                // Indicates that only a fallback adapter can be returned.
                force_fallback_adapter: false,
                // Request an adapter which can render to our surface
                compatible_surface: Some(&surface),
            })
            .await
            .expect("Failed to find an appropiate adapter");

        tracing::info!(backend = ?adapter.get_info().backend, "selected adapter");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: None,
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .expect("Failed to create device");

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: swapchain_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: CompositeAlphaMode::Auto,
            view_formats: vec![],
        };

        surface.configure(&device, &surface_config);

        Self { device, queue, surface, surface_config }
    }

    pub fn load_wgsl_shader(device: &Device, shader_src: &str) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(shader_src)),
        })
    }

    pub fn begin_frame(&self) -> FrameEncoder {
        let frame =
            self.surface.get_current_texture().expect("Failed to acquire next swap chain texture");

        let backbuffer_view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let encoder =
            self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let surface_dimensions = self.surface_dimensions();

        FrameEncoder { backbuffer_view, frame, encoder, queue: &self.queue, surface_dimensions }
    }

    pub fn end_frame(&self, frame_encoder: FrameEncoder) {
        let FrameEncoder { frame, encoder, .. } = frame_encoder;

        self.queue.submit(Some(encoder.finish()));
        frame.present();
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            // Minimized windows report a zero-sized surface, which wgpu rejects.
            return;
        }

        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
    }

    pub fn surface_dimensions(&self) -> (u32, u32) {
        (self.surface_config.width, self.surface_config.height)
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn surface_config(&self) -> &SurfaceConfiguration {
        &self.surface_config
    }

    pub fn surface_texture_format(&self) -> TextureFormat {
        self.surface_config.format
    }
}

pub struct FrameEncoder<'a> {
    // The `backbuffer_view` field must be listed before the `frame` field.
    // https://github.com/gfx-rs/wgpu/issues/1797
    pub backbuffer_view: TextureView,
    pub frame: SurfaceTexture,
    pub encoder: CommandEncoder,
    queue: &'a Queue,
    surface_dimensions: (u32, u32),
}

impl FrameEncoder<'_> {
    pub fn queue(&self) -> &Queue {
        self.queue
    }

    pub fn surface_dimensions(&self) -> (u32, u32) {
        self.surface_dimensions
    }

    /// Clears the backbuffer. Call before any of the recorders run so the
    /// frame starts from a known background color.
    pub fn clear_screen(&mut self, color: Color) {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear screen"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.backbuffer_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }
}

// Creates a matrix that projects screen coordinates defined by width and
// height orthographically onto the OpenGL vertex coordinates.
pub fn screen_projection_matrix(width: u32, height: u32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width as f32, height as f32, 0.0, -1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_to_array_normalizes_channels() {
        let color = Color::new(255, 0, 51, 255);
        let [r, g, b, a] = color.to_array();

        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert_eq!(b, 0.2);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn screen_projection_maps_corners_to_clip_space() {
        let proj = screen_projection_matrix(100, 50);

        let top_left = proj.project_point3(glam::vec3(0.0, 0.0, 0.0));
        let bottom_right = proj.project_point3(glam::vec3(100.0, 50.0, 0.0));

        assert!((top_left.x - -1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y - -1.0).abs() < 1e-6);
    }
}
