//! wgpu renderer for the stage
//!
//! Owns the device, surface and depth buffer, builds the three pipelines the
//! viewer draws with, and records one frame from ordered [`DrawBatch`]es plus
//! an optional UI overlay.

use std::sync::Arc;

use cgmath::{Matrix4, Vector3};
use log::{info, warn};
use wgpu::TextureFormat;

use super::pipeline_manager::{PipelineConfig, PipelineManager};
use crate::error::{Result, ViewerError};
use crate::gfx::resources::{GlobalBindings, TextureResource};
use crate::gfx::scene::drawable::{DrawLayouts, Drawable};

/// Textured cube seen from inside; never touches depth.
pub const BACKDROP_PIPELINE: &str = "Backdrop";
/// Loaded models, depth tested.
pub const MODEL_PIPELINE: &str = "Models";
/// Unlit, alpha-blended, always on top. Shows the -z face like the backdrop.
pub const OVERLAY_PIPELINE: &str = "Overlay";

/// Drawables that share one pipeline, drawn in order.
pub struct DrawBatch<'a> {
    pub pipeline: &'static str,
    pub drawables: Vec<&'a Drawable>,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_bindings: GlobalBindings,
    layouts: DrawLayouts,
    clear_color: wgpu::Color,
}

impl RenderEngine {
    /// Opens a device for `window` and builds every pipeline.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        vsync: bool,
        clear_color: [f64; 4],
    ) -> Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| ViewerError::Surface("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: present_mode(vsync),
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, config.width, config.height, "Depth");
        let global_bindings = GlobalBindings::new(&device);
        let layouts = DrawLayouts::new(&device);

        let device: Arc<wgpu::Device> = device.into();
        let queue: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("viewer", include_str!("viewer.wgsl"));

        let bind_group_layouts = vec![
            global_bindings.bind_group_layout().clone(),
            layouts.draw.clone(),
            layouts.texture.clone(),
        ];
        let base = PipelineConfig::default()
            .with_shader("viewer")
            .with_bind_group_layouts(bind_group_layouts)
            .with_depth(TextureResource::DEPTH_FORMAT);

        // Procedural cuboids wind clockwise; the camera sits inside the backdrop.
        pipeline_manager.register_pipeline(
            BACKDROP_PIPELINE,
            base.clone()
                .with_label(BACKDROP_PIPELINE)
                .with_front_face(wgpu::FrontFace::Cw)
                .with_cull_mode(Some(wgpu::Face::Front))
                .with_depth_ignored()
                .with_color_target(format, Some(wgpu::BlendState::REPLACE)),
        );
        pipeline_manager.register_pipeline(
            MODEL_PIPELINE,
            base.clone()
                .with_label(MODEL_PIPELINE)
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );
        pipeline_manager.register_pipeline(
            OVERLAY_PIPELINE,
            base.with_label(OVERLAY_PIPELINE)
                .with_front_face(wgpu::FrontFace::Cw)
                .with_cull_mode(Some(wgpu::Face::Front))
                .with_depth_ignored()
                .with_color_target(format, Some(wgpu::BlendState::ALPHA_BLENDING)),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                warn!("{}", error);
            }
        }

        let [r, g, b, a] = clear_color;
        Ok(RenderEngine {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_bindings,
            layouts,
            clear_color: wgpu::Color { r, g, b, a },
        })
    }

    /// Uploads the projection and light position for the next frame.
    pub fn update(&mut self, view_proj: Matrix4<f32>, light_position: Vector3<f32>) {
        self.global_bindings
            .update(&self.queue, view_proj, light_position);
    }

    /// Renders `batches` in order, then the UI overlay if provided.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped.
    pub fn render_frame<F>(&mut self, batches: &[DrawBatch<'_>], ui_callback: Option<F>) -> Result<()>
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Stage Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            for batch in batches {
                let Some(pipeline) = self.pipeline_manager.get_pipeline(batch.pipeline) else {
                    warn!("Pipeline '{}' is not available", batch.pipeline);
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                for drawable in &batch.drawables {
                    drawable.draw(&mut render_pass);
                }
            }
        }

        if let Some(ui_callback) = ui_callback {
            ui_callback(&self.device, &self.queue, &mut encoder, &surface_texture_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Reconfigures the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, width, height, "Depth");
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn device_handle(&self) -> Arc<wgpu::Device> {
        self.device.clone()
    }

    pub fn queue_handle(&self) -> Arc<wgpu::Queue> {
        self.queue.clone()
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.format
    }

    pub fn layouts(&self) -> &DrawLayouts {
        &self.layouts
    }
}

fn present_mode(vsync: bool) -> wgpu::PresentMode {
    if vsync {
        wgpu::PresentMode::AutoVsync
    } else {
        wgpu::PresentMode::AutoNoVsync
    }
}
