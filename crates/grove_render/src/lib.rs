use std::sync::Arc;

use wgpu::{Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::window::Window;

pub mod camera;
pub mod cull;
pub mod error;
pub mod forest;
pub mod input;
pub mod lod;
pub mod raster;
pub mod renderer;
pub mod scene;
pub mod surface;

pub use camera::Camera2D;
pub use cull::{Rect, ViewBounds};
pub use error::{RenderError, Result};
pub use forest::ForestLayout;
pub use input::{CameraAction, GestureTracker, InputEvent, Throttle};
pub use lod::{DetailTier, LodPolicy};
pub use raster::PixelSurface;
pub use renderer::{RendererOptions, ResizeTolerance, TreeRenderer, ViewMode};
pub use scene::{compose_frame, Frame, FrameStats};
pub use surface::{Container, Dimensions, HeadlessContainer, ResizeListeners, SubscriptionId};

pub mod blit_pipeline;
pub use blit_pipeline::BlitPipeline;

/// GPU state for presenting rasterized frames in a window
pub struct GraphicsContext {
    pub surface: Surface<'static>,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
    blit: BlitPipeline,
    pub window: Arc<Window>,
}

impl GraphicsContext {
    /// Create a new GraphicsContext from a window
    /// This initializes the WGPU instance, adapter, device, and surface
    pub fn new(window: Arc<Window>) -> Result<Self> {
        pollster::block_on(Self::new_async(window))
    }

    async fn new_async(window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();

        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .map_err(|e| RenderError::Device(e.to_string()))?;

        // Software rasterized frames need nothing from a discrete GPU
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| RenderError::Device("no compatible adapter".to_string()))?;
        log::info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Main Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                },
                None,
            )
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Device("surface reports no formats".to_string()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &config);

        let blit = BlitPipeline::new(&device, surface_format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            blit,
            window,
        })
    }

    /// Copy a rasterized frame to the window and present it
    pub fn present(&mut self, frame: &PixelSurface) -> std::result::Result<(), wgpu::SurfaceError> {
        let size = frame.image().dimensions();
        self.blit.upload(&self.device, &self.queue, frame.pixels(), size.0, size.1);

        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
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
            self.blit.render(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Resize the surface
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure after a lost or outdated surface
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn config(&self) -> &SurfaceConfiguration {
        &self.config
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }
}
