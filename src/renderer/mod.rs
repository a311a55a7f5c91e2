use anyhow::{Context, Result};
use glam::Vec3;
use log::{info, warn};

use crate::{
    entity::Camera,
    scene::DrawList,
    window::{Size, Window},
};

mod instance;
pub mod render_target;

pub use instance::srgb_to_linear;
use instance::{InstanceRenderer, InstanceRendererBuilder};
use render_target::RenderTarget;

pub struct Renderer {
    surface: wgpu::Surface,
    surface_format: wgpu::TextureFormat,
    size: Size,
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth: RenderTarget,
    instance_renderer: InstanceRenderer,
}

impl Renderer {
    /// `capacity` is the most drawables a single frame can show.
    pub async fn new(window: &impl Window, capacity: usize) -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::Backends::PRIMARY);
        let surface = unsafe { instance.create_surface(window) };

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No adapter found")?;
        info!("Using adapter {:?}", adapter.get_info());

        let surface_format = surface
            .get_preferred_format(&adapter)
            .context("No preferred format found")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .await
            .context("No device found")?;

        let size = window.size();

        Self::configure_surface(&surface, &device, surface_format, size);

        let depth = RenderTarget::depth(&device, size);

        let instance_renderer = InstanceRendererBuilder::new(capacity)
            .color_target_format(surface_format)
            .depth_format(depth.format)
            .linear_colors(surface_format.describe().srgb)
            .build(&device)?;

        Ok(Self {
            surface,
            surface_format,
            size,
            device,
            queue,
            depth,
            instance_renderer,
        })
    }

    pub fn capacity(&self) -> usize {
        self.instance_renderer.capacity()
    }

    fn configure_surface(
        surface: &wgpu::Surface,
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: Size,
    ) {
        surface.configure(
            device,
            &wgpu::SurfaceConfiguration {
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                format,
                width: size.width,
                height: size.height,
                present_mode: wgpu::PresentMode::Fifo,
            },
        )
    }

    /// Minimised windows report a zero size; those are skipped until the
    /// window comes back.
    pub fn resize(&mut self, size: Size) {
        if size.is_empty() {
            return;
        }
        self.size = size;
        Self::configure_surface(&self.surface, &self.device, self.surface_format, size);
        self.depth = RenderTarget::depth(&self.device, size);
    }

    pub fn render(&mut self, draw_list: &DrawList, camera: &Camera, background: Vec3) -> Result<()> {
        if self.size.is_empty() {
            return Ok(());
        }

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost, reconfiguring");
                self.resize(self.size);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring the next frame");
                return Ok(());
            }
            Err(e) => return Err(e).context("Failed to acquire next frame"),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.instance_renderer.update(&self.queue, draw_list, camera);

        let background = if self.surface_format.describe().srgb {
            srgb_to_linear(background)
        } else {
            background
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Command Encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.x as f64,
                            g: background.y as f64,
                            b: background.z as f64,
                            a: 1.0,
                        }),
                        store: true,
                    },
                }],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.texture_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: false,
                    }),
                    stencil_ops: None,
                }),
            });

            self.instance_renderer.draw(&mut rpass);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(())
    }
}
