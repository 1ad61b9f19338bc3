//! Global uniform bindings: per-frame data shared by every pipeline,
//! bound at group 0.

use crate::{gfx::camera::camera_utils::CameraUniform, wgpu_utils::uniform_buffer::UniformBuffer};

/// Contents of the global uniform buffer. Field order and padding must
/// match the `Globals` struct in both shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    /// Camera eye position, homogeneous.
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
    light_position: [f32; 3],
    /// 1.0 when lighting is on, 0.0 for flat unlit shading. Doubles as
    /// the alignment padding after the vec3.
    lighting_enabled: f32,
    light_color: [f32; 3],
    light_intensity: f32,
}

/// Light parameters for the shaded draw mode.
#[derive(Copy, Clone, Debug)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [5.0, 10.0, 5.0],
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
        }
    }
}

pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Pushes fresh camera and light data into the global uniform buffer.
/// Called once per frame before encoding.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    light: LightConfig,
    lighting_enabled: bool,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,
        light_position: light.position,
        lighting_enabled: if lighting_enabled { 1.0 } else { 0.0 },
        light_color: light.color,
        light_intensity: light.intensity,
    };

    ubo.update_content(queue, content);
}

/// Bind group layout and bind group for the global uniforms.
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
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

        Self {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group once the uniform buffer exists. Must run
    /// before the first frame.
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        }));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// # Panics
    /// Panics if [`create_bind_group`](Self::create_bind_group) has not
    /// run yet.
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("global bind group has not been created yet")
    }
}
