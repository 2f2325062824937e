use glam::{Mat4, Quat, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by a position, a rotation and projection
/// parameters.
///
/// The camera looks down its local −Z axis with +Y up, so an identity
/// rotation faces −Z in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub position: Vec3,
    /// Orientation of the camera in world space.
    pub rotation: Quat,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer shared by the skybox and particle shaders.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Inverse of the rotation-only view-projection, used to turn
    /// fullscreen clip positions into skybox lookup directions.
    pub sky_inv_view_proj: [[f32; 4]; 4],
    /// Viewport size in physical pixels.
    pub viewport: [f32; 2],
    /// Host pixel ratio (physical / logical pixels).
    pub pixel_ratio: f32,
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Camera {
    /// Camera at the origin, facing −Z, configured from options.
    #[must_use]
    pub fn from_options(options: &CameraOptions) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            aspect: 1.0,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Update the aspect ratio from a viewport size. Zero-sized viewports
    /// are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// World-space direction the camera looks along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// World-to-view transform.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.view_matrix()
    }

    /// View-projection with translation stripped, as the skybox sees it.
    #[must_use]
    pub fn build_sky_matrix(&self) -> Mat4 {
        self.build_projection() * Mat4::from_quat(self.rotation.inverse())
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity matrices.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            sky_inv_view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            viewport: [1.0, 1.0],
            pixel_ratio: 1.0,
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the given camera and viewport.
    pub fn update(
        &mut self,
        camera: &Camera,
        viewport: (u32, u32),
        pixel_ratio: f32,
    ) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.sky_inv_view_proj =
            camera.build_sky_matrix().inverse().to_cols_array_2d();
        self.viewport = [viewport.0.max(1) as f32, viewport.1.max(1) as f32];
        self.pixel_ratio = pixel_ratio;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_camera_faces_negative_z() {
        let camera = Camera::from_options(&CameraOptions::default());
        assert!(camera.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn set_viewport_updates_aspect() {
        let mut camera = Camera::from_options(&CameraOptions::default());
        camera.set_viewport(1920, 1080);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        camera.set_viewport(0, 600);
        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn sky_matrix_ignores_translation() {
        let mut camera = Camera::from_options(&CameraOptions::default());
        camera.rotation = Quat::from_rotation_y(0.7);
        let at_origin = camera.build_sky_matrix();
        camera.position = Vec3::new(3.0, -2.0, 5.0);
        assert!(camera.build_sky_matrix().abs_diff_eq(at_origin, 1e-6));
    }

    #[test]
    fn point_ahead_projects_to_center() {
        let camera = Camera::from_options(&CameraOptions::default());
        let clip = camera.build_matrix() * Vec3::new(0.0, 0.0, -5.0).extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }
}
