//! WebGPU instanced renderer
//!
//! Draws a [`Scene`] with two meshes and one pipeline.

pub mod draw;
pub mod init;
pub mod pipeline;
pub mod resources;

use thiserror::Error;
use wgpu::*;

use crate::camera::{Camera, CameraUniform};
use crate::mesh::{unit_circle, unit_quad, Mesh};
use crate::scene::Scene;
use resources::InstanceBuffer;

const CIRCLE_SEGMENTS: u16 = 32;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("renderer init failed: {0}")]
    Init(String),
    #[error("frame failed: {0}")]
    Frame(String),
}

pub struct Renderer {
    pub device: Device,
    pub queue: Queue,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub pipeline: RenderPipeline,
    pub camera_buffer: Buffer,
    pub camera_bind_group: BindGroup,
    pub instances: InstanceBuffer,
    pub quad: Mesh,
    pub circle: Mesh,
}

impl Renderer {
    pub async fn new(canvas: web_sys::HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = init::init_wgpu(canvas).await?;
        let camera = Camera::orthographic(ctx.config.width as f32, ctx.config.height as f32);

        let pipes = pipeline::create_pipeline(&ctx.device, ctx.config.format);
        let camera_buffer = resources::create_camera_buffer(&ctx.device, &camera);
        let camera_bind_group = ctx.device.create_bind_group(&BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &pipes.camera_layout,
            entries: &[BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let quad = Mesh::new(&ctx.device, "Quad", unit_quad());
        let circle = Mesh::new(&ctx.device, "Circle", unit_circle(CIRCLE_SEGMENTS));
        let instances = InstanceBuffer::new(&ctx.device);

        Ok(Self {
            device: ctx.device,
            queue: ctx.queue,
            surface: ctx.surface,
            surface_config: ctx.config,
            pipeline: pipes.pipeline,
            camera_buffer,
            camera_bind_group,
            instances,
            quad,
            circle,
        })
    }

    /// Reconfigure the surface and camera for a new pixel size
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if (width, height) == (self.surface_config.width, self.surface_config.height) {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);

        let camera = Camera::orthographic(width as f32, height as f32);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[CameraUniform::from_camera(&camera)]),
        );
    }

    pub fn draw(&mut self, scene: &Scene) -> Result<(), RenderError> {
        draw::draw_frame(self, scene)
    }
}
