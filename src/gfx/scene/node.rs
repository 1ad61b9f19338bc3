//! Scene graph nodes.
//!
//! A loaded scene is a tree of [`SceneNode`]s, each owning its children
//! outright. Nodes are assembled once by the scene loader, never edited
//! afterwards, and dropped as a whole on unload.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::geometry::{generate, resolve_mesh, RawFaceSet, ShapeKind, TriangleMesh};

/// Default display color for nodes with no authored color.
pub const DEFAULT_COLOR: [f32; 3] = [0.7, 0.7, 0.8];

/// Geometry attached to a node.
#[derive(Debug, Clone)]
pub enum Payload {
    /// An extracted or generated mesh, shared with the draw list.
    Mesh(Arc<TriangleMesh>),
    /// A reference to an external asset that could not be resolved at
    /// load time. Contributes nothing to the draw list; the walker
    /// surfaces it as a warning.
    Unresolved { reference: String },
}

/// One node of the scene graph.
///
/// The local transform composes with ancestor transforms as
/// `world = parent_world * local` (column vectors, matching cgmath).
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Matrix4<f32>,
    pub payload: Option<Payload>,
    pub children: Vec<SceneNode>,
    pub color: [f32; 3],
    pub visible: bool,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Matrix4::identity(),
            payload: None,
            children: Vec::new(),
            color: DEFAULT_COLOR,
            visible: true,
        }
    }

    pub fn with_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_translation(mut self, translation: Vector3<f32>) -> Self {
        self.transform = Matrix4::from_translation(translation);
        self
    }

    pub fn with_mesh(mut self, mesh: Arc<TriangleMesh>) -> Self {
        self.payload = Some(Payload::Mesh(mesh));
        self
    }

    /// Attaches a freshly generated primitive mesh.
    pub fn with_shape(self, shape: &ShapeKind) -> Self {
        self.with_mesh(Arc::new(generate(shape)))
    }

    /// Attaches geometry extracted from raw polygonal face data.
    /// Malformed data is replaced by the fallback box rather than
    /// failing the node.
    pub fn with_raw_faces(self, raw: &RawFaceSet) -> Self {
        let mesh = resolve_mesh(raw, &self.name);
        self.with_mesh(mesh)
    }

    pub fn with_unresolved_reference(mut self, reference: impl Into<String>) -> Self {
        self.payload = Some(Payload::Unresolved {
            reference: reference.into(),
        });
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_visibility(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(SceneNode::node_count)
            .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_faces_attach_extracted_mesh() {
        let raw = RawFaceSet {
            points: vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
            ],
            face_counts: vec![4],
            face_indices: vec![0, 1, 2, 3],
        };
        let node = SceneNode::new("quad").with_raw_faces(&raw);
        match node.payload {
            Some(Payload::Mesh(mesh)) => assert_eq!(mesh.triangle_count(), 2),
            other => panic!("expected mesh payload, got {other:?}"),
        }
    }

    #[test]
    fn malformed_raw_faces_fall_back_to_box() {
        let node = SceneNode::new("broken").with_raw_faces(&RawFaceSet::default());
        match node.payload {
            Some(Payload::Mesh(mesh)) => assert_eq!(mesh.triangle_count(), 12),
            other => panic!("expected fallback mesh, got {other:?}"),
        }
    }

    #[test]
    fn node_count_covers_subtree() {
        let tree = SceneNode::new("a")
            .with_child(SceneNode::new("b").with_child(SceneNode::new("c")))
            .with_child(SceneNode::new("d"));
        assert_eq!(tree.node_count(), 4);
    }
}
