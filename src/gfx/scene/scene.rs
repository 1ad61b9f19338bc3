//! The scene container: a loaded node tree, its flattened draw list,
//! and the camera viewing it.

use cgmath::Vector3;
use log::{info, warn};

use crate::gfx::{
    camera::camera_utils::CameraManager,
    geometry::{Aabb, ShapeKind},
    scene::{
        node::SceneNode,
        walker::{walk, world_bounds, DrawListEntry},
    },
};

/// Owns the scene graph root and the draw list derived from it.
///
/// The draw list is rebuilt whenever a new root is set; between reloads
/// both the tree and the list are immutable, so every frame reads the
/// same data.
pub struct Scene {
    pub camera_manager: CameraManager,
    root: SceneNode,
    entries: Vec<DrawListEntry>,
    bounds: Option<Aabb>,
}

impl Scene {
    pub fn new(camera_manager: CameraManager) -> Self {
        Self {
            camera_manager,
            root: SceneNode::new("root"),
            entries: Vec::new(),
            bounds: None,
        }
    }

    /// Replaces the scene graph and rebuilds the draw list.
    ///
    /// Walker warnings (unresolved references) are logged here, one line
    /// per node; they never fail the load.
    pub fn set_root(&mut self, root: SceneNode) {
        self.root = root;
        let output = walk(&self.root);
        for warning in &output.warnings {
            warn!("{warning}");
        }
        self.bounds = world_bounds(&output.entries);
        self.entries = output.entries;

        let stats = self.statistics();
        info!(
            "scene loaded: {} nodes, {} draw entries, {} triangles, {} vertices",
            stats.node_count, stats.entry_count, stats.total_triangles, stats.total_vertices
        );
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// The flattened draw list in stable traversal order.
    pub fn entries(&self) -> &[DrawListEntry] {
        &self.entries
    }

    /// World-space bounds of the current draw list, for camera framing.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    /// Frames the camera on the scene bounds, or resets it for an empty
    /// scene.
    pub fn frame_camera(&mut self) {
        match self.bounds {
            Some(bounds) => self.camera_manager.camera.frame(bounds.min, bounds.max),
            None => self.camera_manager.camera.reset(),
        }
    }

    /// Refreshes per-frame camera state. Called once per redraw.
    pub fn update(&mut self) {
        self.camera_manager.camera.update_view_proj();
    }

    pub fn statistics(&self) -> SceneStatistics {
        let total_triangles = self
            .entries
            .iter()
            .map(|entry| entry.mesh.triangle_count())
            .sum();
        let total_vertices = self
            .entries
            .iter()
            .map(|entry| entry.mesh.vertex_count())
            .sum();

        SceneStatistics {
            node_count: self.root.node_count(),
            entry_count: self.entries.len(),
            total_triangles,
            total_vertices,
        }
    }
}

/// Scene statistics for logging and debugging.
#[derive(Debug)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub entry_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

/// A small hierarchical demo scene used when no loader supplies content:
/// a box at the origin with a sphere child offset along +X, and a few
/// more primitives spread around it.
pub fn sample_scene() -> SceneNode {
    SceneNode::new("world")
        .with_child(
            SceneNode::new("box")
                .with_shape(&ShapeKind::Box {
                    half_extents: [0.5; 3],
                })
                .with_color([0.3, 0.6, 0.9])
                .with_child(
                    SceneNode::new("sphere")
                        .with_translation(Vector3::new(2.0, 0.0, 0.0))
                        .with_shape(&ShapeKind::Sphere {
                            radius: 0.7,
                            latitude_segments: 16,
                            longitude_segments: 24,
                        })
                        .with_color([0.9, 0.5, 0.3]),
                ),
        )
        .with_child(
            SceneNode::new("capsule")
                .with_translation(Vector3::new(-2.0, 0.0, 0.0))
                .with_shape(&ShapeKind::Capsule {
                    radius: 0.4,
                    height: 1.0,
                    segments: 16,
                    rings: 8,
                })
                .with_color([0.4, 0.8, 0.5]),
        )
        .with_child(
            SceneNode::new("cone")
                .with_translation(Vector3::new(0.0, 0.0, 2.0))
                .with_shape(&ShapeKind::Cone {
                    radius: 0.5,
                    height: 1.2,
                    segments: 20,
                })
                .with_color([0.8, 0.8, 0.3]),
        )
        .with_child(
            SceneNode::new("cylinder")
                .with_translation(Vector3::new(0.0, 0.0, -2.0))
                .with_shape(&ShapeKind::Cylinder {
                    radius: 0.5,
                    height: 1.2,
                    segments: 20,
                })
                .with_color([0.7, 0.4, 0.8]),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::{camera_controller::CameraController, orbit_camera::OrbitCamera};

    fn test_scene() -> Scene {
        let camera = OrbitCamera::new(5.0, 0.5, 0.8, Vector3::new(0.0, 0.0, 0.0), 1.0);
        let controller = CameraController::new(0.005, 1.0);
        Scene::new(CameraManager::new(camera, controller))
    }

    #[test]
    fn set_root_rebuilds_draw_list_and_bounds() {
        let mut scene = test_scene();
        assert!(scene.entries().is_empty());

        scene.set_root(sample_scene());
        let stats = scene.statistics();
        assert_eq!(stats.entry_count, 5);
        assert_eq!(stats.node_count, 6);
        assert!(stats.total_triangles > 0);
        assert!(scene.bounds().is_some());
    }

    #[test]
    fn framing_empty_scene_resets_camera() {
        let mut scene = test_scene();
        scene.camera_manager.camera.distance = 42.0;
        scene.frame_camera();
        assert!(scene.camera_manager.camera.distance.is_finite());
        assert!(scene.camera_manager.camera.distance > 0.0);
    }
}
