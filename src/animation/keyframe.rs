//! Authored keyframe data.
//!
//! These types mirror the JSON stored with each assembly step. Field names
//! follow the authored camelCase; vectors are `{ "x", "y", "z" }` objects and a
//! rotation is a quaternion when it carries `w`, an Euler triple otherwise.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ============================================================================
// Vectors and rotations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vector3 {
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// Euler rotation order, named as in authored data (`"XYZ"`, `"YXZ"`, ...).
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl From<EulerOrder> for EulerRot {
    fn from(order: EulerOrder) -> Self {
        match order {
            EulerOrder::XYZ => EulerRot::XYZ,
            EulerOrder::XZY => EulerRot::XZY,
            EulerOrder::YXZ => EulerRot::YXZ,
            EulerOrder::YZX => EulerRot::YZX,
            EulerOrder::ZXY => EulerRot::ZXY,
            EulerOrder::ZYX => EulerRot::ZYX,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rotation {
    Quaternion { x: f32, y: f32, z: f32, w: f32 },
    Euler {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        z: f32,
        #[serde(default)]
        order: EulerOrder,
    },
}

impl Rotation {
    /// Euler rotation in radians, XYZ order.
    #[must_use]
    pub const fn euler(x: f32, y: f32, z: f32) -> Self {
        Self::Euler { x, y, z, order: EulerOrder::XYZ }
    }

    #[must_use]
    pub fn from_quat(q: Quat) -> Self {
        Self::Quaternion { x: q.x, y: q.y, z: q.z, w: q.w }
    }

    /// Unit quaternion form; degenerate quaternions map to identity.
    #[must_use]
    pub fn to_quat(&self) -> Quat {
        match *self {
            Self::Quaternion { x, y, z, w } => {
                let q = Quat::from_xyzw(x, y, z, w);
                if q.length_squared() > 1e-12 {
                    q.normalize()
                } else {
                    Quat::IDENTITY
                }
            }
            Self::Euler { x, y, z, order } => Quat::from_euler(order.into(), x, y, z),
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        match *self {
            Self::Quaternion { x, y, z, w } => [x, y, z, w].iter().all(|c| c.is_finite()),
            Self::Euler { x, y, z, .. } => [x, y, z].iter().all(|c| c.is_finite()),
        }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::euler(0.0, 0.0, 0.0)
    }
}

// ============================================================================
// Keyframes
// ============================================================================

fn default_scale() -> Vector3 {
    Vector3::ONE
}

/// Pose of one object at one keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeTransform {
    #[serde(default)]
    pub position: Vector3,
    #[serde(default)]
    pub rotation: Rotation,
    #[serde(default = "default_scale")]
    pub scale: Vector3,
}

impl KeyframeTransform {
    #[must_use]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position: position.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for KeyframeTransform {
    fn default() -> Self {
        Self {
            position: Vector3::default(),
            rotation: Rotation::default(),
            scale: Vector3::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectKeyframe {
    pub object_id: String,
    pub time: f32,
    #[serde(default)]
    pub transform: KeyframeTransform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl ObjectKeyframe {
    #[must_use]
    pub fn new(object_id: impl Into<String>, time: f32, transform: KeyframeTransform) -> Self {
        Self {
            object_id: object_id.into(),
            time,
            transform,
            visible: None,
        }
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Absent visibility means visible.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// Camera easing curve applied to the bracket factor.
///
/// Unrecognised names deserialize as [`Easing::Linear`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    EaseIn,
    EaseOut,
    EaseInOut,
    #[default]
    #[serde(other)]
    Linear,
}

impl Easing {
    /// Maps a linear factor in `[0, 1]` through the curve.
    #[must_use]
    pub fn apply(self, f: f32) -> f32 {
        match self {
            Self::Linear => f,
            Self::EaseIn => f * f,
            Self::EaseOut => f * (2.0 - f),
            Self::EaseInOut => {
                if f < 0.5 {
                    2.0 * f * f
                } else {
                    -1.0 + (4.0 - 2.0 * f) * f
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraKeyframe {
    pub time: f32,
    pub position: Vector3,
    pub target: Vector3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing: Option<Easing>,
}

impl CameraKeyframe {
    #[must_use]
    pub fn new(time: f32, position: Vec3, target: Vec3) -> Self {
        Self {
            time,
            position: position.into(),
            target: target.into(),
            easing: None,
        }
    }
}

// ============================================================================
// Step animation
// ============================================================================

/// Problems found by [`StepAnimation::validate`]. None of them is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationIssue {
    InvalidDuration(f32),
    EmptyObjectId { index: usize },
    InvalidObjectTime { index: usize, time: f32 },
    NonFiniteTransform { index: usize },
    InvalidCameraTime { index: usize, time: f32 },
    NonFiniteCamera { index: usize },
    KeyframeBeyondDuration { time: f32, duration: f32 },
}

/// Keyframe animation attached to one assembly step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepAnimation {
    pub duration: f32,
    #[serde(default)]
    pub object_keyframes: Vec<ObjectKeyframe>,
    #[serde(default)]
    pub camera_keyframes: Vec<CameraKeyframe>,
}

impl StepAnimation {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// `true` when there is nothing to animate at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object_keyframes.is_empty() && self.camera_keyframes.is_empty()
    }

    /// Duration usable by the playback clock: non-finite or negative values
    /// become zero.
    #[must_use]
    pub fn playback_duration(&self) -> f32 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration
        } else {
            0.0
        }
    }

    /// Distinct object ids in order of first appearance.
    #[must_use]
    pub fn object_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for key in &self.object_keyframes {
            if !ids.contains(&key.object_id.as_str()) {
                ids.push(&key.object_id);
            }
        }
        ids
    }

    /// Lists authoring problems without rejecting the animation.
    #[must_use]
    pub fn validate(&self) -> Vec<AnimationIssue> {
        let mut issues = Vec::new();
        if !self.duration.is_finite() || self.duration < 0.0 {
            issues.push(AnimationIssue::InvalidDuration(self.duration));
        }
        let duration = self.playback_duration();

        for (index, key) in self.object_keyframes.iter().enumerate() {
            if key.object_id.is_empty() {
                issues.push(AnimationIssue::EmptyObjectId { index });
            }
            if !key.time.is_finite() || key.time < 0.0 {
                issues.push(AnimationIssue::InvalidObjectTime { index, time: key.time });
            } else if key.time > duration {
                issues.push(AnimationIssue::KeyframeBeyondDuration { time: key.time, duration });
            }
            if !key.transform.is_finite() {
                issues.push(AnimationIssue::NonFiniteTransform { index });
            }
        }

        for (index, key) in self.camera_keyframes.iter().enumerate() {
            if !key.time.is_finite() || key.time < 0.0 {
                issues.push(AnimationIssue::InvalidCameraTime { index, time: key.time });
            } else if key.time > duration {
                issues.push(AnimationIssue::KeyframeBeyondDuration { time: key.time, duration });
            }
            if !key.position.is_finite() || !key.target.is_finite() {
                issues.push(AnimationIssue::NonFiniteCamera { index });
            }
        }

        issues
    }
}
