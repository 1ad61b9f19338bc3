//! Convenience wrappers for common wgpu operations.

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;
