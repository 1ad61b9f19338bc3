// src/lib.rs
//! Stageview
//!
//! An interactive viewer for hierarchical 3D scene graphs, built on
//! wgpu and winit. Scenes are trees of transform and geometry nodes;
//! the viewer flattens them into a draw list and renders with orbit
//! camera controls and cycling draw modes.

pub mod app;
pub mod gfx;
pub mod input;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use gfx::scene::{sample_scene, SceneNode};
