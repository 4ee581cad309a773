use glam::{Mat4, Vec3};

use crate::scene::transform::Transform;
use crate::utils::orbit_control::OrbitControls;

/// Perspective camera with orbit controls attached.
///
/// The camera is not part of the model's scene graph: the model is swapped
/// per product while the camera persists for the whole viewing session.
#[derive(Debug, Clone)]
pub struct Camera {
    pub transform: Transform,
    pub controls: OrbitControls,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// `fov` is given in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            transform: Transform::new(),
            controls: OrbitControls::default(),
            fov: fov.to_radians(),
            aspect,
            near,
            far,
        };
        camera.controls.update(&mut camera.transform);
        camera
    }

    /// Moves the camera to `position`, aims it at `target` and commits the
    /// orbit controls.
    pub fn set_view(&mut self, position: Vec3, target: Vec3) {
        self.controls.look_from(&mut self.transform, position, target);
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.controls.center
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::ONE,
            self.transform.rotation,
            self.transform.position,
        )
        .inverse()
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new_perspective(45.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}
