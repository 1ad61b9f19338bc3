//! Scene graph traversal.
//!
//! Flattens a [`SceneNode`] tree into the per-frame draw list:
//! depth-first, pre-order, composing world transforms on the way down.
//! The output order is the declaration order of children, so repeated
//! walks of the same tree are byte-for-byte reproducible.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use super::node::{Payload, SceneNode};
use crate::gfx::geometry::{Aabb, TriangleMesh};

/// One renderable entry produced by a walk. Holds a shared reference to
/// the node's mesh, never a copy; rebuilt fresh on every walk and never
/// mutated in place.
#[derive(Debug, Clone)]
pub struct DrawListEntry {
    /// Full node path, `/`-joined from the root.
    pub path: String,
    pub world: Matrix4<f32>,
    pub mesh: Arc<TriangleMesh>,
    pub color: [f32; 3],
}

/// Result of walking a scene graph: the flattened draw list plus the
/// per-node warnings collected along the way (unresolved references).
#[derive(Debug, Default)]
pub struct WalkOutput {
    pub entries: Vec<DrawListEntry>,
    pub warnings: Vec<String>,
}

/// Walks the tree rooted at `root` and returns the flattened draw list.
///
/// A node with `visible = false` hides its entire subtree, regardless of
/// the visibility flags on its descendants.
pub fn walk(root: &SceneNode) -> WalkOutput {
    let mut output = WalkOutput::default();
    visit(root, Matrix4::identity(), "", &mut output);
    output
}

fn visit(node: &SceneNode, parent_world: Matrix4<f32>, parent_path: &str, output: &mut WalkOutput) {
    if !node.visible {
        return;
    }

    let path = format!("{parent_path}/{}", node.name);
    let world = parent_world * node.transform;

    match &node.payload {
        Some(Payload::Mesh(mesh)) => output.entries.push(DrawListEntry {
            path: path.clone(),
            world,
            mesh: Arc::clone(mesh),
            color: node.color,
        }),
        Some(Payload::Unresolved { reference }) => output
            .warnings
            .push(format!("{path}: unresolved reference '{reference}'")),
        None => {}
    }

    for child in &node.children {
        visit(child, world, &path, output);
    }
}

/// Union AABB of all entries with their world transforms applied, used
/// for camera framing. `None` for an empty draw list.
pub fn world_bounds(entries: &[DrawListEntry]) -> Option<Aabb> {
    let mut bounds: Option<Aabb> = None;
    for entry in entries {
        let Some(local) = entry.mesh.aabb() else {
            continue;
        };
        let world = local.transformed(&entry.world);
        match &mut bounds {
            Some(total) => total.union(&world),
            None => bounds = Some(world),
        }
    }
    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::ShapeKind;
    use cgmath::Vector3;

    fn unit_box() -> ShapeKind {
        ShapeKind::Box {
            half_extents: [0.5; 3],
        }
    }

    #[test]
    fn translated_child_yields_one_entry_with_composed_world() {
        let root = SceneNode::new("root").with_child(
            SceneNode::new("child")
                .with_translation(Vector3::new(2.0, 0.0, 0.0))
                .with_shape(&unit_box()),
        );

        let output = walk(&root);
        assert_eq!(output.entries.len(), 1);
        assert!(output.warnings.is_empty());

        let entry = &output.entries[0];
        assert_eq!(entry.path, "/root/child");
        let translation = entry.world.w.truncate();
        assert_eq!(translation, Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn nested_transforms_compose_parent_times_local() {
        let root = SceneNode::new("root")
            .with_translation(Vector3::new(1.0, 0.0, 0.0))
            .with_child(
                SceneNode::new("mid")
                    .with_translation(Vector3::new(0.0, 2.0, 0.0))
                    .with_child(
                        SceneNode::new("leaf")
                            .with_translation(Vector3::new(0.0, 0.0, 3.0))
                            .with_shape(&unit_box()),
                    ),
            );

        let output = walk(&root);
        assert_eq!(output.entries.len(), 1);
        assert_eq!(
            output.entries[0].world.w.truncate(),
            Vector3::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn hidden_node_prunes_whole_subtree() {
        let root = SceneNode::new("root")
            .with_child(
                SceneNode::new("hidden")
                    .with_visibility(false)
                    // Child is marked visible, but its ancestor wins.
                    .with_child(SceneNode::new("inner").with_shape(&unit_box())),
            )
            .with_child(SceneNode::new("shown").with_shape(&unit_box()));

        let output = walk(&root);
        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.entries[0].path, "/root/shown");
    }

    #[test]
    fn traversal_order_is_declaration_order() {
        let root = SceneNode::new("root")
            .with_child(
                SceneNode::new("a")
                    .with_shape(&unit_box())
                    .with_child(SceneNode::new("a1").with_shape(&unit_box())),
            )
            .with_child(SceneNode::new("b").with_shape(&unit_box()));

        let first = walk(&root);
        let second = walk(&root);
        let paths: Vec<&str> = first.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["/root/a", "/root/a/a1", "/root/b"]);
        assert_eq!(
            paths,
            second
                .entries
                .iter()
                .map(|e| e.path.as_str())
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn unresolved_reference_contributes_warning_not_entry() {
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("missing").with_unresolved_reference("asset://teapot"))
            .with_child(SceneNode::new("present").with_shape(&unit_box()));

        let output = walk(&root);
        assert_eq!(output.entries.len(), 1);
        assert_eq!(output.warnings.len(), 1);
        assert!(output.warnings[0].contains("/root/missing"));
        assert!(output.warnings[0].contains("asset://teapot"));
    }

    #[test]
    fn world_bounds_covers_translated_meshes() {
        let root = SceneNode::new("root")
            .with_child(SceneNode::new("origin").with_shape(&unit_box()))
            .with_child(
                SceneNode::new("far")
                    .with_translation(Vector3::new(4.0, 0.0, 0.0))
                    .with_shape(&unit_box()),
            );

        let output = walk(&root);
        let bounds = world_bounds(&output.entries).unwrap();
        assert_eq!(bounds.min, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vector3::new(4.5, 0.5, 0.5));
    }
}
