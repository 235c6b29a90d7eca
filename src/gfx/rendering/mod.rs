//! # Rendering Boundary
//!
//! Traits the scene draws through, plus the wgpu-backed instance buffers
//! used by instanced objects.
//!
//! - [`RenderBackend`] - Program activation, named uniforms and draw calls
//! - [`InstanceUpload`] - Bulk per-instance matrix upload
//! - [`InstanceBuffers`] - wgpu vertex buffers implementing the upload side

pub mod backend;
pub mod instance_buffer;

pub use backend::{InstanceBufferId, InstanceUpload, MeshHandle, RenderBackend, ShaderHandle};
pub use instance_buffer::{InstanceBuffers, InstanceRaw, InstanceWriter};

#[cfg(test)]
pub(crate) use backend::recording;
