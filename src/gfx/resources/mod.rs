//! GPU resource management: global uniform bindings and texture
//! helpers.

pub mod global_bindings;
pub mod texture_resource;

pub use global_bindings::{GlobalBindings, GlobalUBO, LightConfig};
pub use texture_resource::TextureResource;
