use glam::Mat4;
use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::simulation::PointVertex;

/// Owns the point vertex buffer and the camera uniform.
///
/// The vertex buffer mirrors `HeightField::vertices()` and is rewritten in
/// one `write_buffer` call per frame, after the CPU update has touched every
/// particle. Nothing else writes to it.
pub struct PointBuffers {
    pub vertex_buffer: Buffer,
    pub camera_buffer: Buffer,
    vertex_count: u32,
}

/// Camera uniform passed to the point shader (128 bytes, two mat4x4)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// Projection * view, column-major
    pub view_proj: [[f32; 4]; 4],
    /// Model transform for the cloud's spin, column-major
    pub model: [[f32; 4]; 4],
}

impl PointBuffers {
    /// Create the buffers and upload the initial particle state
    pub fn new(device: &Device, queue: &Queue, vertices: &[PointVertex]) -> Self {
        let buffer_size = std::mem::size_of_val(vertices) as u64;

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("point-vertex-buffer"),
            size: buffer_size,
            usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("camera-uniform-buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(vertices));

        Self {
            vertex_buffer,
            camera_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    /// Upload the full displayed-position buffer. Called exactly once per
    /// frame, after the whole field has been updated.
    pub fn upload_vertices(&self, queue: &Queue, vertices: &[PointVertex]) {
        debug_assert_eq!(vertices.len() as u32, self.vertex_count);
        queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
    }

    /// Update the camera uniform for this frame
    pub fn update_camera(&self, queue: &Queue, view_proj: Mat4, model: Mat4) {
        let uniform = CameraUniform {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        };
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
