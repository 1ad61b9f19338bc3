//! # Geometry
//!
//! Mesh data structures plus the two ways of producing them: extraction
//! from authored polygonal face data ([`extract`]) and procedural
//! generation of analytic shapes ([`primitives`]).
//!
//! All meshes are indexed triangle lists with per-vertex normals, ready
//! for GPU upload via [`TriangleMesh::to_vertex_data`].

pub mod extract;
pub mod primitives;

use cgmath::{Matrix4, Vector3, Vector4};

pub use extract::{extract, resolve_mesh, GeometryError, RawFaceSet};
pub use primitives::{generate, ShapeKind};

/// An indexed triangle mesh with per-vertex normals.
///
/// `positions` and `normals` always have the same length; every index in
/// `triangles` is less than the vertex count. Normals are unit length,
/// except for vertices untouched by any face, which keep a zero normal.
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, same length as `positions`
    pub normals: Vec<[f32; 3]>,
    /// Triangles as index triples into `positions`
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Axis-aligned bounding box over all vertex positions, or `None`
    /// for an empty mesh.
    pub fn aabb(&self) -> Option<Aabb> {
        let mut points = self.positions.iter();
        let first = Vector3::from(*points.next()?);
        let mut bounds = Aabb {
            min: first,
            max: first,
        };
        for p in points {
            bounds.grow(Vector3::from(*p));
        }
        Some(bounds)
    }

    /// Flattens into the renderer's vertex format and a flat index list.
    pub fn to_vertex_data(&self) -> (Vec<crate::gfx::scene::vertex::Vertex3D>, Vec<u32>) {
        use crate::gfx::scene::vertex::Vertex3D;

        let vertices: Vec<Vertex3D> = self
            .positions
            .iter()
            .zip(self.normals.iter())
            .map(|(position, normal)| Vertex3D {
                position: *position,
                normal: *normal,
            })
            .collect();

        let indices: Vec<u32> = self.triangles.iter().flatten().copied().collect();

        (vertices, indices)
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Expands the box to contain `point`.
    pub fn grow(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Expands the box to contain another box.
    pub fn union(&mut self, other: &Aabb) {
        self.grow(other.min);
        self.grow(other.max);
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn extents(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// The eight corner points of the box.
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// The box containing this box after an affine transform.
    ///
    /// Transforms all eight corners rather than min/max alone, so
    /// rotations are handled correctly.
    pub fn transformed(&self, transform: &Matrix4<f32>) -> Aabb {
        let mut corners = self.corners().into_iter();
        let first = (transform * corners.next().unwrap().extend(1.0)).truncate();
        let mut bounds = Aabb {
            min: first,
            max: first,
        };
        for corner in corners {
            let mapped: Vector4<f32> = transform * corner.extend(1.0);
            bounds.grow(mapped.truncate());
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Matrix4;

    #[test]
    fn aabb_grows_to_contain_points() {
        let mut bounds = Aabb {
            min: Vector3::new(0.0, 0.0, 0.0),
            max: Vector3::new(0.0, 0.0, 0.0),
        };
        bounds.grow(Vector3::new(-1.0, 2.0, 0.5));
        assert_eq!(bounds.min, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(0.0, 2.0, 0.5));
    }

    #[test]
    fn aabb_transformed_by_translation() {
        let bounds = Aabb {
            min: Vector3::new(-1.0, -1.0, -1.0),
            max: Vector3::new(1.0, 1.0, 1.0),
        };
        let moved = bounds.transformed(&Matrix4::from_translation(Vector3::new(3.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vector3::new(2.0, -1.0, -1.0));
        assert_eq!(moved.max, Vector3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn mesh_aabb_matches_positions() {
        let mesh = TriangleMesh {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [-1.0, 0.0, 0.0]],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            triangles: vec![[0, 1, 2]],
        };
        let bounds = mesh.aabb().unwrap();
        assert_eq!(bounds.min, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 2.0, 3.0));
        assert!(TriangleMesh::new().aabb().is_none());
    }
}
