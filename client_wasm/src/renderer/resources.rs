use wgpu::util::DeviceExt;
use wgpu::*;

use crate::camera::{Camera, CameraUniform};
use crate::scene::InstanceData;

const INITIAL_INSTANCES: u64 = 256;

pub fn create_camera_buffer(device: &Device, camera: &Camera) -> Buffer {
    device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some("Camera Buffer"),
        contents: bytemuck::cast_slice(&[CameraUniform::from_camera(camera)]),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    })
}

/// Instance vertex buffer, grown (doubled) when a frame needs more room
pub struct InstanceBuffer {
    pub buffer: Buffer,
    capacity: u64,
}

impl InstanceBuffer {
    pub fn new(device: &Device) -> Self {
        Self {
            buffer: Self::allocate(device, INITIAL_INSTANCES),
            capacity: INITIAL_INSTANCES,
        }
    }

    fn allocate(device: &Device, capacity: u64) -> Buffer {
        device.create_buffer(&BufferDescriptor {
            label: Some("Instance Buffer"),
            size: capacity * std::mem::size_of::<InstanceData>() as u64,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Upload `instances`, reallocating first if they don't fit
    pub fn write(&mut self, device: &Device, queue: &Queue, instances: &[InstanceData]) {
        let needed = instances.len() as u64;
        if needed > self.capacity {
            let mut capacity = self.capacity.max(1);
            while capacity < needed {
                capacity *= 2;
            }
            tracing::debug!(capacity, "growing instance buffer");
            self.buffer = Self::allocate(device, capacity);
            self.capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(instances));
        }
    }
}
