//! # Graphics Module
//!
//! Everything between a loaded scene graph and pixels:
//!
//! - **Geometry** ([`geometry`]) - mesh extraction from authored face
//!   data and procedural primitives
//! - **Scene** ([`scene`]) - the node tree, its traversal into a draw
//!   list, and the scene container
//! - **Camera** ([`camera`]) - orbit camera with pan, zoom, and scene
//!   framing
//! - **Render state** ([`render_state`]) - draw mode cycling and the
//!   grid/axes/lighting toggles
//! - **Rendering** ([`rendering`]) - the wgpu submission layer
//! - **Resources** ([`resources`]) - global uniforms and GPU textures

pub mod camera;
pub mod geometry;
pub mod render_state;
pub mod rendering;
pub mod resources;
pub mod scene;

pub use camera::OrbitCamera;
pub use render_state::{DrawMode, RenderState};
pub use rendering::RenderEngine;
