use glam::Vec3;

use crate::scene::transform::Transform;

const EPS: f32 = 0.0001;

/// Orbit controller state: a spherical offset around a look-at `center`.
///
/// Camera keyframes write position and target directly; [`OrbitControls::look_from`]
/// re-derives the spherical coordinates so user interaction continues
/// smoothly from the animated pose.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    revision: u64,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            min_distance: 0.01,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            revision: 0,
        }
    }

    /// Places the camera at `position` looking at `target` and commits the
    /// change, the equivalent of notifying the controls of a manual target edit.
    pub fn look_from(&mut self, transform: &mut Transform, position: Vec3, target: Vec3) {
        self.center = target;

        let offset = position - target;
        let radius = offset.length();
        if radius > EPS {
            self.radius = radius;
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
        }

        transform.position = position;
        transform.look_at(self.center, Vec3::Y);
        transform.mark_dirty();
        self.revision = self.revision.wrapping_add(1);
    }

    /// Applies the current spherical state to `transform`.
    pub fn update(&mut self, transform: &mut Transform) {
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
        self.radius = self.radius.clamp(self.min_distance, self.max_distance);

        let sin_phi = self.phi.sin();
        let cos_phi = self.phi.cos();
        let sin_theta = self.theta.sin();
        let cos_theta = self.theta.cos();

        let offset = Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );

        transform.position = self.center + offset;
        transform.look_at(self.center, Vec3::Y);
        self.revision = self.revision.wrapping_add(1);
    }

    /// Number of commits so far; hosts compare it to detect external edits.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 5.0)
    }
}
