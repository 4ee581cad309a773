//! Keyframe animation for assembly steps.
//!
//! - [`keyframe`]: authored data (object and camera keyframes, step animation)
//! - [`tracks`]: time-sorted tracks and bracket lookup
//! - [`evaluate`]: pose interpolation and visibility fades
//! - [`clock`]: playback clock
//! - [`binder`]: object-id to node binding cache
//! - [`controller`]: per-step orchestration and frame ticks

pub mod binder;
pub mod clock;
pub mod controller;
pub mod evaluate;
pub mod keyframe;
pub mod step;
pub mod tracks;
pub mod values;

pub use binder::Binder;
pub use clock::{ClockEvent, PlaybackClock, PlaybackState};
pub use controller::{ControllerOptions, PlaybackEvent, StepAnimationController, TickHandle};
pub use evaluate::{CameraPose, FadeMode, PoseSample, evaluate, evaluate_camera};
pub use keyframe::{
    AnimationIssue, CameraKeyframe, Easing, EulerOrder, KeyframeTransform, ObjectKeyframe,
    Rotation, StepAnimation, Vector3,
};
pub use step::{Step, StepId};
pub use tracks::{Bracket, CameraTrack, KeyframeCursor, KeyframeTrack, ObjectTrack, Timed};
