//! Mesh generation
//!
//! Two unit meshes centred on the origin: a quad for rects and a circle for
//! the ball and particles. Instances scale them to pixel size.

/// Vertex data for meshes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
}

/// Unit quad spanning -0.5..0.5 on both axes
pub fn unit_quad() -> (Vec<Vertex>, Vec<u16>) {
    let vertices = vec![
        Vertex { position: [-0.5, -0.5] },
        Vertex { position: [0.5, -0.5] },
        Vertex { position: [0.5, 0.5] },
        Vertex { position: [-0.5, 0.5] },
    ];
    let indices = vec![0, 1, 2, 2, 3, 0];
    (vertices, indices)
}

/// Triangle fan circle of diameter 1
pub fn unit_circle(segments: u16) -> (Vec<Vertex>, Vec<u16>) {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity(segments as usize + 1);
    let mut indices = Vec::with_capacity(segments as usize * 3);

    vertices.push(Vertex { position: [0.0, 0.0] });
    for i in 0..segments {
        let theta = std::f32::consts::TAU * i as f32 / segments as f32;
        vertices.push(Vertex {
            position: [0.5 * theta.cos(), 0.5 * theta.sin()],
        });
    }

    for i in 0..segments {
        let current = i + 1;
        let next = (i + 1) % segments + 1;
        indices.extend_from_slice(&[0, current, next]);
    }

    (vertices, indices)
}

#[cfg(target_arch = "wasm32")]
pub use gpu::Mesh;

#[cfg(target_arch = "wasm32")]
mod gpu {
    use super::Vertex;
    use wgpu::util::DeviceExt;
    use wgpu::*;

    /// Mesh data with GPU buffers
    pub struct Mesh {
        pub vertex_buffer: Buffer,
        pub index_buffer: Buffer,
        pub index_count: u32,
    }

    impl Mesh {
        pub fn new(device: &Device, label: &str, (vertices, indices): (Vec<Vertex>, Vec<u16>)) -> Self {
            let vertex_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
                label: Some(&format!("{} Vertex Buffer", label)),
                contents: bytemuck::cast_slice(&vertices),
                usage: BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&util::BufferInitDescriptor {
                label: Some(&format!("{} Index Buffer", label)),
                contents: bytemuck::cast_slice(&indices),
                usage: BufferUsages::INDEX,
            });
            Self {
                vertex_buffer,
                index_buffer,
                index_count: indices.len() as u32,
            }
        }
    }
}
