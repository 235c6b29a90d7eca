//! GPU-side storage for per-instance world matrices
//!
//! Each instanced scene object owns one vertex buffer stepped per instance.
//! Uploads are bulk overwrites through [`wgpu::Queue::write_buffer`]; the
//! buffer is recreated when the instance count outgrows it.

use bytemuck::{Pod, Zeroable};
use cgmath::Matrix4;
use wgpu::{Buffer, Device, Queue};

use super::backend::{InstanceBufferId, InstanceUpload};

/// One instance's world matrix as laid out in the vertex buffer
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
}

impl From<&Matrix4<f32>> for InstanceRaw {
    fn from(matrix: &Matrix4<f32>) -> Self {
        Self {
            model: (*matrix).into(),
        }
    }
}

impl InstanceRaw {
    /// Shader locations for the four matrix columns, after position/normal/uv
    pub const FIRST_LOCATION: u32 = 3;

    /// Vertex buffer layout for instance data
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
            3 => Float32x4,
            4 => Float32x4,
            5 => Float32x4,
            6 => Float32x4
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }

    pub fn collect(matrices: &[Matrix4<f32>]) -> Vec<InstanceRaw> {
        matrices.iter().map(InstanceRaw::from).collect()
    }
}

struct GpuInstanceBuffer {
    buffer: Buffer,
    capacity: usize,
    instance_count: u32,
}

/// Registry of instance buffers, addressed by [`InstanceBufferId`]
#[derive(Default)]
pub struct InstanceBuffers {
    buffers: Vec<GpuInstanceBuffer>,
}

impl InstanceBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a buffer with room for `capacity` instances
    pub fn create(&mut self, device: &Device, capacity: usize) -> InstanceBufferId {
        let id = InstanceBufferId(self.buffers.len() as u32);
        let buffer = allocate(device, id, capacity.max(1));
        self.buffers.push(GpuInstanceBuffer {
            buffer,
            capacity: capacity.max(1),
            instance_count: 0,
        });
        id
    }

    /// Vertex buffer to bind at the instance slot
    pub fn buffer(&self, id: InstanceBufferId) -> Option<&Buffer> {
        self.buffers.get(id.0 as usize).map(|b| &b.buffer)
    }

    /// Number of instances written by the last upload
    pub fn instance_count(&self, id: InstanceBufferId) -> u32 {
        self.buffers
            .get(id.0 as usize)
            .map_or(0, |b| b.instance_count)
    }

    /// Binds device and queue for a batch of uploads
    pub fn writer<'a>(&'a mut self, device: &'a Device, queue: &'a Queue) -> InstanceWriter<'a> {
        InstanceWriter {
            buffers: self,
            device,
            queue,
        }
    }
}

/// [`InstanceUpload`] sink writing into [`InstanceBuffers`]
pub struct InstanceWriter<'a> {
    buffers: &'a mut InstanceBuffers,
    device: &'a Device,
    queue: &'a Queue,
}

impl InstanceUpload for InstanceWriter<'_> {
    fn upload_instances(&mut self, id: InstanceBufferId, matrices: &[Matrix4<f32>]) {
        let Some(slot) = self.buffers.buffers.get_mut(id.0 as usize) else {
            log::warn!("upload to unknown instance buffer {:?} ignored", id);
            return;
        };

        if matrices.len() > slot.capacity {
            log::debug!(
                "growing instance buffer {:?} from {} to {} instances",
                id,
                slot.capacity,
                matrices.len()
            );
            slot.buffer = allocate(self.device, id, matrices.len());
            slot.capacity = matrices.len();
        }

        let raw = InstanceRaw::collect(matrices);
        self.queue
            .write_buffer(&slot.buffer, 0, bytemuck::cast_slice(&raw));
        slot.instance_count = matrices.len() as u32;
    }
}

fn allocate(device: &Device, id: InstanceBufferId, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("Instance Buffer {}", id.0)),
        size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_instance_raw_layout() {
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 64);

        let layout = InstanceRaw::vertex_buffer_layout();
        assert_eq!(layout.array_stride, 64);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        assert_eq!(layout.attributes.len(), 4);
        assert_eq!(layout.attributes[0].shader_location, InstanceRaw::FIRST_LOCATION);
        assert_eq!(layout.attributes[3].offset, 48);
    }

    #[test]
    fn test_instance_raw_is_column_major() {
        let matrix = Matrix4::from_translation(Vector3::new(4.0, 5.0, 6.0));
        let raw = InstanceRaw::collect(&[matrix]);
        assert_eq!(raw[0].model[3], [4.0, 5.0, 6.0, 1.0]);

        let bytes: &[u8] = bytemuck::cast_slice(&raw);
        assert_eq!(bytes.len(), 64);
    }
}
