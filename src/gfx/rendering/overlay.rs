//! Viewport overlays: the XZ ground grid and the origin axis tripod.
//!
//! Both are static line lists generated on the CPU once at engine
//! startup; the render state toggles only decide whether they are drawn.

use wgpu::util::DeviceExt;

/// Vertex format for overlay lines.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

const GRID_SIZE: f32 = 10.0;
const GRID_DIVISIONS: u32 = 20;
const GRID_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
const AXIS_LENGTH: f32 = 1.0;

/// GPU-resident overlay line buffers.
pub struct Overlay {
    pub grid_buffer: wgpu::Buffer,
    pub grid_vertex_count: u32,
    pub axes_buffer: wgpu::Buffer,
    pub axes_vertex_count: u32,
}

impl Overlay {
    pub fn new(device: &wgpu::Device) -> Self {
        let grid = grid_lines(GRID_SIZE, GRID_DIVISIONS);
        let axes = axes_lines(AXIS_LENGTH);

        let grid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid Vertex Buffer"),
            contents: bytemuck::cast_slice(&grid),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let axes_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Axes Vertex Buffer"),
            contents: bytemuck::cast_slice(&axes),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            grid_buffer,
            grid_vertex_count: grid.len() as u32,
            axes_buffer,
            axes_vertex_count: axes.len() as u32,
        }
    }
}

/// Ground grid in the XZ plane at y = 0.
fn grid_lines(size: f32, divisions: u32) -> Vec<LineVertex> {
    let mut vertices = Vec::with_capacity(((divisions + 1) * 4) as usize);
    let half = size * 0.5;
    let step = size / divisions as f32;

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;
        // Line along X.
        vertices.push(LineVertex {
            position: [-half, 0.0, offset],
            color: GRID_COLOR,
        });
        vertices.push(LineVertex {
            position: [half, 0.0, offset],
            color: GRID_COLOR,
        });
        // Line along Z.
        vertices.push(LineVertex {
            position: [offset, 0.0, -half],
            color: GRID_COLOR,
        });
        vertices.push(LineVertex {
            position: [offset, 0.0, half],
            color: GRID_COLOR,
        });
    }

    vertices
}

/// Axis tripod at the origin: X red, Y green, Z blue.
fn axes_lines(length: f32) -> Vec<LineVertex> {
    let axes = [
        ([length, 0.0, 0.0], [1.0, 0.2, 0.2]),
        ([0.0, length, 0.0], [0.2, 1.0, 0.2]),
        ([0.0, 0.0, length], [0.2, 0.2, 1.0]),
    ];

    axes.iter()
        .flat_map(|&(end, color)| {
            [
                LineVertex {
                    position: [0.0; 3],
                    color,
                },
                LineVertex {
                    position: end,
                    color,
                },
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_two_lines_per_division_row() {
        let vertices = grid_lines(10.0, 20);
        // 21 rows, 2 lines each, 2 vertices per line.
        assert_eq!(vertices.len(), 21 * 4);
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }

    #[test]
    fn axes_are_three_colored_lines() {
        let vertices = axes_lines(1.0);
        assert_eq!(vertices.len(), 6);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[3].position, [0.0, 1.0, 0.0]);
        assert_eq!(vertices[5].position, [0.0, 0.0, 1.0]);
    }
}
