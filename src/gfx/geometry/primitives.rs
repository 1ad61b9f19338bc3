//! # Primitive Shape Generation
//!
//! Procedural meshes for the built-in analytic shapes. Generation is
//! pure and deterministic: the same [`ShapeKind`] always produces the
//! same mesh, which keeps golden-output tests honest.
//!
//! All shapes are centered at the origin with +Y up. Subdivision counts
//! below the minimum are clamped up rather than rejected, so a
//! non-degenerate mesh always results.

use std::f32::consts::{FRAC_PI_2, PI};

use super::TriangleMesh;

/// Minimum radial subdivision for round shapes.
const MIN_SEGMENTS: u32 = 3;
/// Minimum latitude rows for spheres and capsule caps.
const MIN_RINGS: u32 = 2;

/// The closed set of built-in shapes, each carrying its own parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Axis-aligned box extending `half_extents` from the origin.
    Box { half_extents: [f32; 3] },
    /// UV sphere.
    Sphere {
        radius: f32,
        latitude_segments: u32,
        longitude_segments: u32,
    },
    /// Cylinder along the Y axis, caps included.
    Cylinder {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Cone along the Y axis, apex up, base cap included.
    Cone {
        radius: f32,
        height: f32,
        segments: u32,
    },
    /// Capsule along the Y axis: a cylindrical section of `height`
    /// capped by hemispheres of `radius`.
    Capsule {
        radius: f32,
        height: f32,
        segments: u32,
        rings: u32,
    },
}

/// Generates the mesh for a shape. Pure and deterministic.
pub fn generate(shape: &ShapeKind) -> TriangleMesh {
    match *shape {
        ShapeKind::Box { half_extents } => generate_box(half_extents),
        ShapeKind::Sphere {
            radius,
            latitude_segments,
            longitude_segments,
        } => generate_sphere(radius, latitude_segments, longitude_segments),
        ShapeKind::Cylinder {
            radius,
            height,
            segments,
        } => generate_cylinder(radius, height, segments),
        ShapeKind::Cone {
            radius,
            height,
            segments,
        } => generate_cone(radius, height, segments),
        ShapeKind::Capsule {
            radius,
            height,
            segments,
            rings,
        } => generate_capsule(radius, height, segments, rings),
    }
}

/// Box as 24 vertices (4 per face) so each face keeps a flat normal.
fn generate_box(half_extents: [f32; 3]) -> TriangleMesh {
    let [hx, hy, hz] = half_extents;
    let mut mesh = TriangleMesh::new();

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [
                [-hx, -hy, hz],
                [hx, -hy, hz],
                [hx, hy, hz],
                [-hx, hy, hz],
            ],
        ),
        (
            [0.0, 0.0, -1.0],
            [
                [hx, -hy, -hz],
                [-hx, -hy, -hz],
                [-hx, hy, -hz],
                [hx, hy, -hz],
            ],
        ),
        (
            [-1.0, 0.0, 0.0],
            [
                [-hx, -hy, -hz],
                [-hx, -hy, hz],
                [-hx, hy, hz],
                [-hx, hy, -hz],
            ],
        ),
        (
            [1.0, 0.0, 0.0],
            [
                [hx, -hy, hz],
                [hx, -hy, -hz],
                [hx, hy, -hz],
                [hx, hy, hz],
            ],
        ),
        (
            [0.0, 1.0, 0.0],
            [
                [-hx, hy, hz],
                [hx, hy, hz],
                [hx, hy, -hz],
                [-hx, hy, -hz],
            ],
        ),
        (
            [0.0, -1.0, 0.0],
            [
                [-hx, -hy, -hz],
                [hx, -hy, -hz],
                [hx, -hy, hz],
                [-hx, -hy, hz],
            ],
        ),
    ];

    for (normal, corners) in faces {
        let base = mesh.positions.len() as u32;
        for corner in corners {
            mesh.positions.push(corner);
            mesh.normals.push(normal);
        }
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base + 2, base + 3, base]);
    }

    mesh
}

/// UV sphere with analytic normals (the normal of a unit sphere point is
/// the point itself).
fn generate_sphere(radius: f32, latitude_segments: u32, longitude_segments: u32) -> TriangleMesh {
    let lat_segs = latitude_segments.max(MIN_SEGMENTS);
    let long_segs = longitude_segments.max(MIN_SEGMENTS);
    let mut mesh = TriangleMesh::new();

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let nx = sin_theta * cos_phi;
            let ny = cos_theta;
            let nz = sin_theta * sin_phi;

            mesh.positions.push([radius * nx, radius * ny, radius * nz]);
            mesh.normals.push([nx, ny, nz]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            mesh.triangles.push([first, second, first + 1]);
            mesh.triangles.push([second, second + 1, first + 1]);
        }
    }

    mesh
}

fn generate_cylinder(radius: f32, height: f32, segments: u32) -> TriangleMesh {
    let segs = segments.max(MIN_SEGMENTS);
    let half_height = height * 0.5;
    let mut mesh = TriangleMesh::new();

    // Side wall: bottom/top vertex pairs around the ring, seam duplicated.
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let x = radius * cos_a;
        let z = radius * sin_a;

        mesh.positions.push([x, -half_height, z]);
        mesh.normals.push([cos_a, 0.0, sin_a]);

        mesh.positions.push([x, half_height, z]);
        mesh.normals.push([cos_a, 0.0, sin_a]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        mesh.triangles
            .push([bottom_current, top_current, bottom_next]);
        mesh.triangles.push([top_current, top_next, bottom_next]);
    }

    // Caps: center fan with flat normals.
    for (y, normal) in [(-half_height, [0.0, -1.0, 0.0]), (half_height, [0.0, 1.0, 0.0])] {
        let center = mesh.positions.len() as u32;
        mesh.positions.push([0.0, y, 0.0]);
        mesh.normals.push(normal);

        let ring_base = mesh.positions.len() as u32;
        for i in 0..=segs {
            let angle = i as f32 * 2.0 * PI / segs as f32;
            let (sin_a, cos_a) = angle.sin_cos();
            mesh.positions.push([radius * cos_a, y, radius * sin_a]);
            mesh.normals.push(normal);
        }
        for i in 0..segs {
            if normal[1] < 0.0 {
                mesh.triangles.push([center, ring_base + i, ring_base + i + 1]);
            } else {
                mesh.triangles.push([center, ring_base + i + 1, ring_base + i]);
            }
        }
    }

    mesh
}

fn generate_cone(radius: f32, height: f32, segments: u32) -> TriangleMesh {
    let segs = segments.max(MIN_SEGMENTS);
    let half_height = height * 0.5;
    let mut mesh = TriangleMesh::new();

    // Side wall: base ring plus one apex vertex per segment so the slant
    // normal stays per-segment.
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        let slant = slant_normal(radius, height, cos_a, sin_a);

        mesh.positions
            .push([radius * cos_a, -half_height, radius * sin_a]);
        mesh.normals.push(slant);

        mesh.positions.push([0.0, half_height, 0.0]);
        mesh.normals.push(slant);
    }

    for i in 0..segs {
        let base_current = i * 2;
        let apex_current = base_current + 1;
        let base_next = (i + 1) * 2;
        mesh.triangles.push([base_current, apex_current, base_next]);
    }

    // Base cap.
    let center = mesh.positions.len() as u32;
    mesh.positions.push([0.0, -half_height, 0.0]);
    mesh.normals.push([0.0, -1.0, 0.0]);

    let ring_base = mesh.positions.len() as u32;
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        mesh.positions
            .push([radius * cos_a, -half_height, radius * sin_a]);
        mesh.normals.push([0.0, -1.0, 0.0]);
    }
    for i in 0..segs {
        mesh.triangles.push([center, ring_base + i, ring_base + i + 1]);
    }

    mesh
}

/// Outward normal of the cone's slant surface at ring angle (cos, sin).
fn slant_normal(radius: f32, height: f32, cos_a: f32, sin_a: f32) -> [f32; 3] {
    let length = (height * height + radius * radius).sqrt();
    if length > 0.0 {
        [
            height * cos_a / length,
            radius / length,
            height * sin_a / length,
        ]
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// Capsule as one continuous latitude stack: top hemisphere rows, bottom
/// hemisphere rows, with the gap between the two equator rows forming
/// the cylindrical wall. Equator normals are horizontal, so the wall
/// shades correctly without extra vertices.
fn generate_capsule(radius: f32, height: f32, segments: u32, rings: u32) -> TriangleMesh {
    let segs = segments.max(MIN_SEGMENTS);
    let rings = rings.max(MIN_RINGS);
    let half_height = height.max(0.0) * 0.5;
    let mut mesh = TriangleMesh::new();

    let mut push_row = |theta: f32, y_offset: f32, mesh: &mut TriangleMesh| {
        let (sin_theta, cos_theta) = theta.sin_cos();
        for j in 0..=segs {
            let phi = j as f32 * 2.0 * PI / segs as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            let nx = sin_theta * cos_phi;
            let ny = cos_theta;
            let nz = sin_theta * sin_phi;
            mesh.positions
                .push([radius * nx, radius * ny + y_offset, radius * nz]);
            mesh.normals.push([nx, ny, nz]);
        }
    };

    // Top hemisphere: pole down to the equator.
    for i in 0..=rings {
        let theta = FRAC_PI_2 * i as f32 / rings as f32;
        push_row(theta, half_height, &mut mesh);
    }
    // Bottom hemisphere: equator down to the pole.
    for i in 0..=rings {
        let theta = FRAC_PI_2 + FRAC_PI_2 * i as f32 / rings as f32;
        push_row(theta, -half_height, &mut mesh);
    }

    let row_stride = segs + 1;
    let row_count = 2 * (rings + 1);
    for row in 0..row_count - 1 {
        for j in 0..segs {
            let first = row * row_stride + j;
            let second = first + row_stride;

            mesh.triangles.push([first, second, first + 1]);
            mesh.triangles.push([second, second + 1, first + 1]);
        }
    }

    mesh
}
