//! Extraction of renderable triangle meshes from authored polygonal
//! face data.
//!
//! Scene descriptions store geometry as arbitrary-arity polygons: a flat
//! point array, a per-face vertex count array, and a flat index array.
//! [`extract`] converts that representation into an indexed
//! [`TriangleMesh`] by fan triangulation and derives per-vertex normals
//! when the source authored none.

use std::sync::Arc;

use log::warn;
use thiserror::Error;

use super::{generate, ShapeKind, TriangleMesh};

/// Raw polygonal face data as authored in a scene description.
///
/// `face_counts[f]` is the arity of face `f`; `face_indices` holds the
/// concatenated vertex indices of all faces, so its length must equal
/// the sum of `face_counts`.
#[derive(Debug, Clone, Default)]
pub struct RawFaceSet {
    pub points: Vec<[f32; 3]>,
    pub face_counts: Vec<u32>,
    pub face_indices: Vec<u32>,
}

/// Per-mesh extraction failures. These are data errors confined to one
/// mesh; callers keep the rest of the scene alive (see [`resolve_mesh`]).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("face set has no points")]
    Empty,

    #[error("vertex index {index} out of range for {point_count} points")]
    IndexOutOfRange { index: u32, point_count: usize },

    #[error("face counts sum to {expected} indices but {actual} were supplied")]
    IndexCountMismatch { expected: usize, actual: usize },
}

/// Converts a raw polygonal face set into an indexed triangle mesh.
///
/// Each face `[i0, i1, .., iN-1]` is fan-triangulated from its first
/// vertex into triangles `(i0, ik, ik+1)`. This is deliberately the
/// cheap policy: it is correct for convex faces and for the vast
/// majority of authored meshes, and produces degenerate or overlapping
/// triangles for non-convex faces. That limitation is accepted rather
/// than silently changing output with ear clipping.
///
/// Faces with fewer than three vertices are skipped with a warning;
/// they never abort the mesh.
///
/// Normals: one normal per face, from the cross product of the first
/// triangle's edge vectors, accumulated unweighted into every vertex the
/// face references and normalized at the end. Vertices referenced by no
/// face keep a zero normal.
pub fn extract(raw: &RawFaceSet) -> Result<TriangleMesh, GeometryError> {
    let point_count = raw.points.len();
    if point_count == 0 {
        return Err(GeometryError::Empty);
    }

    if let Some(&index) = raw
        .face_indices
        .iter()
        .find(|&&index| index as usize >= point_count)
    {
        return Err(GeometryError::IndexOutOfRange { index, point_count });
    }

    let expected: usize = raw.face_counts.iter().map(|&count| count as usize).sum();
    if expected != raw.face_indices.len() {
        return Err(GeometryError::IndexCountMismatch {
            expected,
            actual: raw.face_indices.len(),
        });
    }

    let mut triangles = Vec::new();
    let mut normal_sums = vec![[0.0f32; 3]; point_count];
    let mut touch_counts = vec![0u32; point_count];

    let mut cursor = 0usize;
    for (face, &count) in raw.face_counts.iter().enumerate() {
        let count = count as usize;
        let face_indices = &raw.face_indices[cursor..cursor + count];
        cursor += count;

        if count < 3 {
            warn!("skipping face {face} with only {count} vertices");
            continue;
        }

        // Fan from the face's first vertex.
        let i0 = face_indices[0];
        for k in 1..count - 1 {
            triangles.push([i0, face_indices[k], face_indices[k + 1]]);
        }

        let normal = face_normal(&raw.points, face_indices);
        for &index in face_indices {
            let sum = &mut normal_sums[index as usize];
            sum[0] += normal[0];
            sum[1] += normal[1];
            sum[2] += normal[2];
            touch_counts[index as usize] += 1;
        }
    }

    let normals = normal_sums
        .into_iter()
        .zip(touch_counts)
        .map(|(sum, touched)| {
            if touched == 0 {
                return [0.0; 3];
            }
            let averaged = [
                sum[0] / touched as f32,
                sum[1] / touched as f32,
                sum[2] / touched as f32,
            ];
            normalize_or_zero(averaged)
        })
        .collect();

    Ok(TriangleMesh {
        positions: raw.points.clone(),
        normals,
        triangles,
    })
}

/// Extraction with the per-node fallback policy applied: a mesh that
/// fails to extract is replaced by a unit box so the rest of the scene
/// keeps loading.
pub fn resolve_mesh(raw: &RawFaceSet, node_name: &str) -> Arc<TriangleMesh> {
    match extract(raw) {
        Ok(mesh) => Arc::new(mesh),
        Err(error) => {
            warn!("{node_name}: {error}; substituting a unit box");
            Arc::new(generate(&ShapeKind::Box {
                half_extents: [0.5; 3],
            }))
        }
    }
}

/// Normal of a face's first triangle via the edge cross product.
fn face_normal(points: &[[f32; 3]], face_indices: &[u32]) -> [f32; 3] {
    let v0 = points[face_indices[0] as usize];
    let v1 = points[face_indices[1] as usize];
    let v2 = points[face_indices[2] as usize];

    let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
    let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];

    normalize_or_zero([
        edge1[1] * edge2[2] - edge1[2] * edge2[1],
        edge1[2] * edge2[0] - edge1[0] * edge2[2],
        edge1[0] * edge2[1] - edge1[1] * edge2[0],
    ])
}

fn normalize_or_zero(v: [f32; 3]) -> [f32; 3] {
    let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if length > 0.0 {
        [v[0] / length, v[1] / length, v[2] / length]
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> RawFaceSet {
        RawFaceSet {
            points: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            face_counts: vec![4],
            face_indices: vec![0, 1, 2, 3],
        }
    }

    #[test]
    fn quad_fans_into_two_triangles() {
        let mesh = extract(&quad()).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.normals.len(), mesh.positions.len());
    }

    #[test]
    fn ngon_fan_yields_n_minus_two_triangles_sharing_first_vertex() {
        for n in 3..9u32 {
            // Regular n-gon in the XY plane.
            let points: Vec<[f32; 3]> = (0..n)
                .map(|i| {
                    let angle = i as f32 * 2.0 * std::f32::consts::PI / n as f32;
                    [angle.cos(), angle.sin(), 0.0]
                })
                .collect();
            let raw = RawFaceSet {
                points,
                face_counts: vec![n],
                face_indices: (0..n).collect(),
            };
            let mesh = extract(&raw).unwrap();
            assert_eq!(mesh.triangle_count(), (n - 2) as usize);
            assert!(mesh.triangles.iter().all(|tri| tri[0] == 0));
        }
    }

    #[test]
    fn indices_stay_within_point_range() {
        let mesh = extract(&quad()).unwrap();
        let point_count = mesh.vertex_count() as u32;
        assert!(mesh
            .triangles
            .iter()
            .flatten()
            .all(|&index| index < point_count));
    }

    #[test]
    fn planar_quad_has_unit_normals() {
        let mesh = extract(&quad()).unwrap();
        for normal in &mesh.normals {
            let length =
                (normal[0] * normal[0] + normal[1] * normal[1] + normal[2] * normal[2]).sqrt();
            assert!((length - 1.0).abs() < 1e-6);
            // Quad lies in the XY plane with counter-clockwise winding.
            assert!((normal[2] - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut raw = quad();
        raw.face_indices[2] = 9;
        assert_eq!(
            extract(&raw),
            Err(GeometryError::IndexOutOfRange {
                index: 9,
                point_count: 4
            })
        );
    }

    #[test]
    fn empty_point_set_is_rejected() {
        assert_eq!(extract(&RawFaceSet::default()), Err(GeometryError::Empty));
    }

    #[test]
    fn truncated_index_buffer_is_rejected() {
        let mut raw = quad();
        raw.face_indices.pop();
        assert_eq!(
            extract(&raw),
            Err(GeometryError::IndexCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn degenerate_faces_are_skipped_not_fatal() {
        let raw = RawFaceSet {
            points: quad().points,
            face_counts: vec![2, 3],
            face_indices: vec![0, 1, 0, 1, 2],
        };
        let mesh = extract(&raw).unwrap();
        assert_eq!(mesh.triangles, vec![[0, 1, 2]]);
    }

    #[test]
    fn unreferenced_vertices_keep_zero_normals() {
        let raw = RawFaceSet {
            points: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [5.0, 5.0, 5.0],
            ],
            face_counts: vec![3],
            face_indices: vec![0, 1, 2],
        };
        let mesh = extract(&raw).unwrap();
        assert_eq!(mesh.normals[3], [0.0; 3]);
    }

    #[test]
    fn bad_mesh_resolves_to_fallback_box() {
        let mesh = resolve_mesh(&RawFaceSet::default(), "/world/broken");
        assert_eq!(mesh.triangle_count(), 12);
        let bounds = mesh.aabb().unwrap();
        assert_eq!(bounds.min, cgmath::Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, cgmath::Vector3::new(0.5, 0.5, 0.5));
    }
}
