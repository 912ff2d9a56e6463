//! Camera for Pong
//!
//! 2D orthographic camera over surface pixels, origin top-left, y down

use glam::{Mat4, Vec3, Vec4};

/// Camera struct
pub struct Camera {
    pub projection: Mat4,
}

impl Camera {
    /// Surface is `width` x `height` pixels
    pub fn orthographic(width: f32, height: f32) -> Self {
        let projection = Mat4::orthographic_rh(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0);
        Self { projection }
    }

    /// Pixel position to clip space
    pub fn project(&self, px: f32, py: f32) -> Vec3 {
        let clip = self.projection * Vec4::new(px, py, 0.0, 1.0);
        clip.truncate() / clip.w
    }
}

/// Camera uniform data (matches WGSL struct, 256-byte aligned)
#[repr(C, align(256))]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_proj: [[f32; 4]; 4], // 64 bytes (mat4x4)
    _padding: [f32; 48],      // 192 bytes padding (48 * 4) to reach 256 bytes
}

impl CameraUniform {
    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.projection.to_cols_array_2d(),
            _padding: [0.0; 48],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corners_map_to_clip_space() {
        let camera = Camera::orthographic(800.0, 600.0);
        let top_left = camera.project(0.0, 0.0);
        let bottom_right = camera.project(800.0, 600.0);
        assert!((top_left.x + 1.0).abs() < 1e-5);
        assert!((top_left.y - 1.0).abs() < 1e-5);
        assert!((bottom_right.x - 1.0).abs() < 1e-5);
        assert!((bottom_right.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 256);
    }
}
