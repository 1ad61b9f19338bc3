//! # Scene Management
//!
//! The hierarchical scene graph and its traversal:
//!
//! - [`SceneNode`] - one node of the loaded tree: name, local transform,
//!   optional geometry payload, owned children, display attributes
//! - [`walker`] - depth-first flattening into the per-frame draw list
//! - [`Scene`] - the container tying the tree, draw list, and camera
//!   together
//! - [`Vertex3D`] - GPU vertex format shared with the renderer

pub mod node;
pub mod scene;
pub mod vertex;
pub mod walker;

pub use node::{Payload, SceneNode};
pub use scene::{sample_scene, Scene, SceneStatistics};
pub use vertex::Vertex3D;
pub use walker::{walk, world_bounds, DrawListEntry, WalkOutput};
