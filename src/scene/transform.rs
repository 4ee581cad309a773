use glam::{Affine3A, Mat3, Quat, Vec3};

/// Local pose of a node plus its cached matrices.
///
/// Fields are written freely by the animation controller; matrices are only
/// rebuilt by the transform system when the pose differs from the one last
/// committed, or after [`Transform::mark_dirty`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,

    pub(crate) local_matrix: Affine3A,
    pub(crate) world_matrix: Affine3A,

    /// Pose the local matrix was built from; `None` forces a rebuild.
    committed: Option<(Vec3, Quat, Vec3)>,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Affine3A::IDENTITY,
            world_matrix: Affine3A::IDENTITY,
            committed: None,
        }
    }

    /// Rebuilds the local matrix if the pose moved since the last commit.
    ///
    /// Returns `true` if the matrix was rebuilt.
    pub fn update_local_matrix(&mut self) -> bool {
        let pose = (self.position, self.rotation, self.scale);
        if self.committed == Some(pose) {
            return false;
        }
        self.local_matrix =
            Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position);
        self.committed = Some(pose);
        true
    }

    /// Writes a full keyframe pose and marks the transform dirty.
    pub fn set_pose(&mut self, position: Vec3, rotation: Quat, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.mark_dirty();
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> &Affine3A {
        &self.local_matrix
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.world_matrix
    }

    pub(crate) fn set_world_matrix(&mut self, world: Affine3A) {
        self.world_matrix = world;
    }

    /// Turns the transform so its -Z axis faces `target` (parent space).
    ///
    /// When the view runs along `up`, the basis is built from a perpendicular
    /// axis instead. Left unchanged only when `target == position`.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return;
        }
        let mut side = forward.cross(up);
        if side.length_squared() < 1e-4 {
            let fallback = if forward.z.abs() < 0.9 { Vec3::Z } else { Vec3::X };
            side = forward.cross(fallback);
        }
        let right = side.normalize();
        let true_up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, true_up, -forward));
    }

    pub fn mark_dirty(&mut self) {
        self.committed = None;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
