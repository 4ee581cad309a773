//! Interpolation engine.
//!
//! Turns a keyframe track and a time into a pose. Position and scale are
//! blended component-wise, rotation by shortest-arc slerp after converting
//! both keyframes to quaternions. Visibility is not interpolated
//! geometrically: a change of visibility across a bracket becomes an opacity
//! cross-fade with the object kept visible.

use glam::{Quat, Vec3};

use crate::animation::keyframe::{CameraKeyframe, ObjectKeyframe};
use crate::animation::tracks::{Bracket, CameraTrack, KeyframeCursor, ObjectTrack};
use crate::animation::values::Interpolatable;

/// How visibility changes between two keyframes are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FadeMode {
    /// Fade opacity over the whole bracket.
    #[default]
    CrossFade,
    /// Keep `prev`'s visibility until `next` is reached.
    Cut,
}

/// Pose of one object at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    pub opacity: f32,
}

impl PoseSample {
    fn from_keyframe(key: &ObjectKeyframe) -> Self {
        let visible = key.is_visible();
        Self {
            position: key.transform.position.into(),
            rotation: key.transform.rotation.to_quat(),
            scale: key.transform.scale.into(),
            visible,
            opacity: if visible { 1.0 } else { 0.0 },
        }
    }
}

/// Camera placement at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    fn from_keyframe(key: &CameraKeyframe) -> Self {
        Self {
            position: key.position.into(),
            target: key.target.into(),
        }
    }
}

/// Evaluates an object track at `time`.
///
/// Returns `None` before the first keyframe (or for an empty track): the
/// caller keeps whatever pose the object already has.
#[must_use]
pub fn evaluate(track: &ObjectTrack, time: f32) -> Option<PoseSample> {
    sample_object(track.bracket(time), FadeMode::CrossFade)
}

/// Cursor-accelerated [`evaluate`] for monotonic playback.
pub fn evaluate_with_cursor(
    track: &ObjectTrack,
    time: f32,
    cursor: &mut KeyframeCursor,
    fade: FadeMode,
) -> Option<PoseSample> {
    sample_object(track.bracket_with_cursor(time, cursor), fade)
}

/// Evaluates a camera track at `time`.
#[must_use]
pub fn evaluate_camera(track: &CameraTrack, time: f32) -> Option<CameraPose> {
    sample_camera(track.bracket(time))
}

pub fn evaluate_camera_with_cursor(
    track: &CameraTrack,
    time: f32,
    cursor: &mut KeyframeCursor,
) -> Option<CameraPose> {
    sample_camera(track.bracket_with_cursor(time, cursor))
}

fn sample_object(bracket: Bracket<'_, ObjectKeyframe>, fade: FadeMode) -> Option<PoseSample> {
    match bracket {
        Bracket::NotStarted => None,
        Bracket::Hold(prev) => Some(PoseSample::from_keyframe(prev)),
        Bracket::Between { prev, next, factor } => {
            let a = PoseSample::from_keyframe(prev);
            let b = PoseSample::from_keyframe(next);

            let (visible, opacity) = match (a.visible, b.visible, fade) {
                (false, true, FadeMode::CrossFade) => (true, factor),
                (true, false, FadeMode::CrossFade) => (true, 1.0 - factor),
                // Constant visibility, or a hard cut that keeps `prev` until
                // `next` becomes the holding keyframe.
                _ => (a.visible, a.opacity),
            };

            Some(PoseSample {
                position: Vec3::interpolate_linear(a.position, b.position, factor),
                rotation: Quat::interpolate_linear(a.rotation, b.rotation, factor),
                scale: Vec3::interpolate_linear(a.scale, b.scale, factor),
                visible,
                opacity,
            })
        }
    }
}

fn sample_camera(bracket: Bracket<'_, CameraKeyframe>) -> Option<CameraPose> {
    match bracket {
        Bracket::NotStarted => None,
        Bracket::Hold(prev) => Some(CameraPose::from_keyframe(prev)),
        Bracket::Between { prev, next, factor } => {
            let f = next.easing.unwrap_or_default().apply(factor);
            let a = CameraPose::from_keyframe(prev);
            let b = CameraPose::from_keyframe(next);
            Some(CameraPose {
                position: Vec3::interpolate_linear(a.position, b.position, f),
                target: Vec3::interpolate_linear(a.target, b.target, f),
            })
        }
    }
}
