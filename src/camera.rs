use glam::{Mat4, Vec3};

use crate::config::{
    CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, CAMERA_PITCH_DEG, CAMERA_RADIUS, CAMERA_YAW_DEG,
};

/// Orbit camera: a spherical offset around a fixed target.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// radians, rotates around +Y
    pub yaw: f32,
    /// radians, elevation above the xz plane
    pub pitch: f32,
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: CAMERA_RADIUS,
            yaw: CAMERA_YAW_DEG.to_radians(),
            pitch: CAMERA_PITCH_DEG.to_radians(),
        }
    }

    pub fn position(&self) -> Vec3 {
        // Spherical coordinates, RH system
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();
        let offset = Vec3::new(
            self.radius * cp * self.yaw.cos(),
            self.radius * sp,
            self.radius * cp * self.yaw.sin(),
        );
        self.target + offset
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn proj(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), aspect, CAMERA_NEAR, CAMERA_FAR)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        self.proj(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_sits_at_radius() {
        let cam = OrbitCamera::new();
        let d = (cam.position() - cam.target).length();
        assert!((d - cam.radius).abs() < 1e-3, "orbit distance {d} != radius");
    }

    #[test]
    fn test_view_looks_at_target() {
        let cam = OrbitCamera::new();
        // the target lands on the view-space -Z axis
        let v = cam.view().transform_point3(cam.target);
        assert!(v.x.abs() < 1e-4 && v.y.abs() < 1e-4);
        assert!(v.z < 0.0, "target should be in front of the camera");
    }
}
