//! GPU state and per-frame rendering.
//!
//! Owns the surface, device, and the three draw passes. Draw order is fixed:
//! background and vignette, then target glyphs, then arrow glyphs, so a
//! mid-collision frame still shows arrows above targets.
//!
//! All simulation math happens in logical (DPR-independent) coordinates; the
//! device pixel ratio only changes the physical buffer behind the surface.

mod background;
mod glyphs;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use winit::window::Window;

use crate::error::GpuError;
use crate::scene::Scene;
use background::BackgroundPass;
use glyphs::GlyphPass;

/// Device pixel ratio cap. High-density displays use at most 2x.
const MAX_DPR: f64 = 2.0;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ViewUniform {
    /// Logical surface size in pixels.
    resolution: [f32; 2],
    _padding: [f32; 2],
}

/// Surface, device, and the fixed set of render passes.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    view_buffer: wgpu::Buffer,
    view_bind_group: wgpu::BindGroup,
    background: BackgroundPass,
    targets: GlyphPass,
    arrows: GlyphPass,
    dpr: f32,
}

impl GpuState {
    /// Acquire adapter, device, and surface for the window and build the
    /// render passes. Fails fast if no compatible GPU is available.
    pub async fn new(
        window: Arc<Window>,
        max_targets: usize,
        max_arrows: usize,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();
        let dpr = window.scale_factor().min(MAX_DPR) as f32;

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let info = adapter.get_info();
        tracing::info!(adapter = %info.name, backend = ?info.backend, "gpu adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("View Uniform Buffer"),
            size: std::mem::size_of::<ViewUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let view_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("View Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let view_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("View Bind Group"),
            layout: &view_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: view_buffer.as_entire_binding(),
            }],
        });

        let background = BackgroundPass::new(&device, surface_format, &view_layout);
        let targets = GlyphPass::targets(&device, surface_format, &view_layout, max_targets);
        let arrows = GlyphPass::arrows(&device, surface_format, &view_layout, max_arrows);

        let state = Self {
            surface,
            device,
            queue,
            config,
            view_buffer,
            view_bind_group,
            background,
            targets,
            arrows,
            dpr,
        };
        state.write_view();
        Ok(state)
    }

    /// Logical surface size: physical pixels divided by the capped DPR.
    pub fn logical_size(&self) -> Vec2 {
        Vec2::new(
            self.config.width as f32 / self.dpr,
            self.config.height as f32 / self.dpr,
        )
    }

    /// Reconfigure for a new physical size or scale factor.
    ///
    /// Repeated identical notifications are no-ops.
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        let dpr = scale_factor.min(MAX_DPR) as f32;
        if new_size.width == self.config.width
            && new_size.height == self.config.height
            && dpr == self.dpr
        {
            return;
        }

        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.dpr = dpr;
        self.surface.configure(&self.device, &self.config);
        self.write_view();
        tracing::debug!(
            width = new_size.width,
            height = new_size.height,
            dpr = self.dpr,
            "surface resized"
        );
    }

    fn write_view(&self) {
        let view = ViewUniform {
            resolution: self.logical_size().to_array(),
            _padding: [0.0; 2],
        };
        self.queue
            .write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&view));
    }

    /// Paint one frame of the composed scene.
    pub fn render(&mut self, scene: &Scene) -> Result<(), wgpu::SurfaceError> {
        self.targets.upload(&self.queue, &scene.targets);
        self.arrows.upload(&self.queue, &scene.arrows);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.view_bind_group, &[]);
            self.background.draw(&mut pass);
            self.targets.draw(&mut pass);
            self.arrows.draw(&mut pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
