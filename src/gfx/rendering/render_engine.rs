//! wgpu-based rendering engine.
//!
//! Owns the surface, device, and pipelines, and turns the per-frame
//! inputs (draw list, camera uniform, render state) into draw calls.
//! Nothing outside this module issues graphics API calls.

use std::sync::Arc;

use anyhow::Context;
use log::warn;
use wgpu::util::DeviceExt;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    render_state::{DrawMode, RenderState},
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, LightConfig},
        texture_resource::TextureResource,
    },
    scene::walker::DrawListEntry,
};

use super::overlay::Overlay;
use super::pipeline_manager::{PipelineConfig, PipelineManager, VertexLayoutKind};

/// Per-entry uniform data. Must match `ObjectUniforms` in mesh.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUBOContent {
    model: [[f32; 4]; 4],
    color: [f32; 4],
}

/// GPU-side mirror of one draw list entry.
struct GpuDrawEntry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    bind_group: wgpu::BindGroup,
}

pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    light_config: LightConfig,
    overlay: Overlay,
    gpu_entries: Vec<GpuDrawEntry>,
    wireframe_supported: bool,
}

impl RenderEngine {
    /// Creates the engine for a window surface.
    ///
    /// This is the one place startup can fail hard: no adapter, no
    /// device, or no usable surface aborts with a diagnostic rather
    /// than limping into the frame loop.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter found")?;

        // Wireframe needs an optional feature; fall back to shaded fill
        // on adapters that lack it instead of refusing to start.
        let wireframe_supported = adapter
            .features()
            .contains(wgpu::Features::POLYGON_MODE_LINE);
        if !wireframe_supported {
            warn!("adapter lacks line polygon mode; wireframe will draw shaded");
        }
        let required_features = if wireframe_supported {
            wgpu::Features::POLYGON_MODE_LINE
        } else {
            wgpu::Features::empty()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features,
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to acquire graphics device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let overlay = Overlay::new(&device);

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("mesh", include_str!("mesh.wgsl"));
        pipeline_manager.load_shader("line", include_str!("line.wgsl"));

        let mesh_layouts = || {
            vec![
                global_bindings.bind_group_layout().clone(),
                object_layout.clone(),
            ]
        };

        pipeline_manager.register_pipeline(
            "shaded",
            PipelineConfig::default()
                .with_label("SHADED")
                .with_shader("mesh")
                .with_bind_group_layouts(mesh_layouts())
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );

        if wireframe_supported {
            pipeline_manager.register_pipeline(
                "wireframe",
                PipelineConfig::default()
                    .with_label("WIREFRAME")
                    .with_shader("mesh")
                    .with_bind_group_layouts(mesh_layouts())
                    .with_polygon_mode(wgpu::PolygonMode::Line)
                    .with_depth_format(TextureResource::DEPTH_FORMAT)
                    .with_color_format(format),
            );
        }

        pipeline_manager.register_pipeline(
            "points",
            PipelineConfig::default()
                .with_label("POINTS")
                .with_shader("mesh")
                .with_bind_group_layouts(mesh_layouts())
                .with_primitive_topology(wgpu::PrimitiveTopology::PointList)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );

        pipeline_manager.register_pipeline(
            "lines",
            PipelineConfig::default()
                .with_label("LINES")
                .with_shader("line")
                .with_bind_group_layouts(vec![global_bindings.bind_group_layout().clone()])
                .with_primitive_topology(wgpu::PrimitiveTopology::LineList)
                .with_vertex_layout(VertexLayoutKind::Line)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_color_format(format),
        );

        pipeline_manager
            .create_all_pipelines()
            .map_err(|errors| anyhow::anyhow!("pipeline creation failed: {}", errors.join("; ")))?;

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            light_config: LightConfig::default(),
            overlay,
            gpu_entries: Vec::new(),
            wireframe_supported,
        })
    }

    /// Uploads the draw list to the GPU: one vertex/index buffer pair
    /// and one transform+color uniform per entry. Called after scene
    /// load, not per frame.
    pub fn upload_scene(&mut self, entries: &[DrawListEntry]) {
        self.gpu_entries.clear();

        for entry in entries {
            let (vertices, indices) = entry.mesh.to_vertex_data();
            if vertices.is_empty() || indices.is_empty() {
                continue;
            }

            let vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Vertex Buffer", entry.path)),
                    contents: bytemuck::cast_slice(&vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
            let index_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Index Buffer", entry.path)),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                });

            let content = ObjectUBOContent {
                model: entry.world.into(),
                color: [entry.color[0], entry.color[1], entry.color[2], 1.0],
            };
            let uniform_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} Uniform Buffer", entry.path)),
                    contents: bytemuck::bytes_of(&content),
                    usage: wgpu::BufferUsages::UNIFORM,
                });

            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", entry.path)),
                layout: &self.object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

            self.gpu_entries.push(GpuDrawEntry {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
                bind_group,
            });
        }
    }

    /// Refreshes the global uniforms from the camera and render state.
    /// Called once per frame before [`render_frame`](Self::render_frame).
    pub fn update(&mut self, camera_uniform: CameraUniform, render_state: &RenderState) {
        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            camera_uniform,
            self.light_config,
            render_state.lighting,
        );
    }

    /// Encodes and submits one frame.
    ///
    /// Surface loss and outdatedness are handled by reconfiguring and
    /// skipping the frame; nothing here is fatal in steady state.
    pub fn render_frame(&mut self, render_state: &RenderState) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(error) => {
                warn!("skipping frame: {error}");
                return;
            }
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
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.15,
                            g: 0.15,
                            b: 0.18,
                            a: 1.0,
                        }),
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

            if let Some(pipeline) = self.pipeline_manager.pipeline(self.mesh_pipeline_name(render_state.draw_mode)) {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                for entry in &self.gpu_entries {
                    render_pass.set_bind_group(1, &entry.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, entry.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(entry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..entry.index_count, 0, 0..1);
                }
            }

            if render_state.show_grid || render_state.show_axes {
                if let Some(pipeline) = self.pipeline_manager.pipeline("lines") {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

                    if render_state.show_grid {
                        render_pass.set_vertex_buffer(0, self.overlay.grid_buffer.slice(..));
                        render_pass.draw(0..self.overlay.grid_vertex_count, 0..1);
                    }
                    if render_state.show_axes {
                        render_pass.set_vertex_buffer(0, self.overlay.axes_buffer.slice(..));
                        render_pass.draw(0..self.overlay.axes_vertex_count, 0..1);
                    }
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    fn mesh_pipeline_name(&self, draw_mode: DrawMode) -> &'static str {
        match draw_mode {
            DrawMode::Shaded => "shaded",
            DrawMode::Wireframe if self.wireframe_supported => "wireframe",
            // Adapter cannot rasterize lines; fall back to fill.
            DrawMode::Wireframe => "shaded",
            DrawMode::Points => "points",
        }
    }

    pub fn set_light(&mut self, light_config: LightConfig) {
        self.light_config = light_config;
    }

    /// Reconfigures the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
