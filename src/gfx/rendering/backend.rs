//! Boundary to the graphics layer
//!
//! The scene never touches shader programs, meshes or GPU buffers directly.
//! It talks to a [`RenderBackend`] through opaque handles that the host hands
//! out when it loads its resources, and pushes instance matrices through an
//! [`InstanceUpload`] sink.

use cgmath::{Matrix4, Vector3};

/// Handle to a shader program owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Handle to a loaded mesh/model owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Handle to a per-instance matrix buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceBufferId(pub u32);

/// Shader binding and draw submission
///
/// Uniform setters address a uniform by its name in the given program. The
/// program must have been activated with [`use_program`](Self::use_program)
/// first.
pub trait RenderBackend {
    fn use_program(&mut self, shader: ShaderHandle);

    fn set_mat4(&mut self, shader: ShaderHandle, name: &str, value: &Matrix4<f32>);
    fn set_vec3(&mut self, shader: ShaderHandle, name: &str, value: Vector3<f32>);
    fn set_float(&mut self, shader: ShaderHandle, name: &str, value: f32);
    fn set_bool(&mut self, shader: ShaderHandle, name: &str, value: bool);
    fn set_int(&mut self, shader: ShaderHandle, name: &str, value: i32);

    fn draw_mesh(&mut self, mesh: MeshHandle, shader: ShaderHandle);
    fn draw_mesh_instanced(&mut self, mesh: MeshHandle, shader: ShaderHandle, instance_count: u32);
}

/// Bulk upload of per-instance world matrices
pub trait InstanceUpload {
    /// Overwrites the whole buffer with `matrices`
    fn upload_instances(&mut self, buffer: InstanceBufferId, matrices: &[Matrix4<f32>]);
}
