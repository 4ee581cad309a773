//! Step animation controller.
//!
//! Owns the active step's tracks and playback clock and applies evaluated
//! poses to the model and camera. The host drives it with two kinds of calls:
//!
//! - step lifecycle: [`StepAnimationController::set_current_step`],
//!   [`apply_initial_state`](StepAnimationController::apply_initial_state),
//!   [`apply_step_animation`](StepAnimationController::apply_step_animation),
//!   [`restart`](StepAnimationController::restart),
//!   [`cancel`](StepAnimationController::cancel);
//! - frame ticks: [`tick`](StepAnimationController::tick) with the
//!   [`TickHandle`] of the current run.
//!
//! # Cancellation
//!
//! Every run gets a fresh [`TickHandle`]. Step changes, restarts and unmounts
//! retire the previous handle, so a frame callback that outlives its run can
//! never mutate a replaced scene.

use std::sync::Arc;

use crate::animation::binder::Binder;
use crate::animation::clock::{ClockEvent, PlaybackClock, PlaybackState};
use crate::animation::evaluate::{
    FadeMode, PoseSample, evaluate_camera_with_cursor, evaluate_with_cursor,
};
use crate::animation::keyframe::{AnimationIssue, StepAnimation};
use crate::animation::step::StepId;
use crate::animation::tracks::{CameraTrack, KeyframeCursor, ObjectTrack};
use crate::scene::{Camera, NodeHandle, Scene};

/// Token for one playback run. Stale tokens make [`StepAnimationController::tick`] a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle {
    generation: u64,
}

/// Notifications raised to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The run reached its duration. Raised once per run.
    Completed { step: Option<StepId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub fade: FadeMode,
    pub animate_camera: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            fade: FadeMode::CrossFade,
            animate_camera: true,
        }
    }
}

#[derive(Debug)]
struct BoundTrack {
    object_id: String,
    track: ObjectTrack,
    cursor: KeyframeCursor,
}

type CompletionListener = Box<dyn FnMut(&PlaybackEvent)>;

pub struct StepAnimationController {
    options: ControllerOptions,

    step: Option<StepId>,
    animation: Option<Arc<StepAnimation>>,
    issues: Vec<AnimationIssue>,
    tracks: Vec<BoundTrack>,
    camera_track: CameraTrack,
    camera_cursor: KeyframeCursor,
    binder: Binder,

    clock: PlaybackClock,
    generation: u64,
    active: Option<TickHandle>,
    pending_initial_state: bool,

    on_complete: Option<CompletionListener>,
}

impl Default for StepAnimationController {
    fn default() -> Self {
        Self::new(ControllerOptions::default())
    }
}

impl StepAnimationController {
    #[must_use]
    pub fn new(options: ControllerOptions) -> Self {
        Self {
            options,
            step: None,
            animation: None,
            issues: Vec::new(),
            tracks: Vec::new(),
            camera_track: CameraTrack::new(Vec::new()),
            camera_cursor: KeyframeCursor::default(),
            binder: Binder::new(),
            clock: PlaybackClock::new(),
            generation: 0,
            active: None,
            pending_initial_state: false,
            on_complete: None,
        }
    }

    /// Registers a callback invoked with every completion event.
    pub fn set_completion_listener(&mut self, listener: impl FnMut(&PlaybackEvent) + 'static) {
        self.on_complete = Some(Box::new(listener));
    }

    pub fn set_options(&mut self, options: ControllerOptions) {
        self.options = options;
    }

    // ========================================================================
    // Step lifecycle
    // ========================================================================

    /// Switches to another step.
    ///
    /// When `step` differs from the current one, any run is cancelled, all
    /// playback state and bindings are dropped, and the new step's initial
    /// state is applied. Returns `false` (and does nothing) for the same step.
    pub fn set_current_step(
        &mut self,
        step: StepId,
        animation: Option<Arc<StepAnimation>>,
        scene: Option<&mut Scene>,
        camera: &mut Camera,
    ) -> bool {
        if self.step.as_ref() == Some(&step) {
            return false;
        }

        log::debug!("Switching to step `{step}`");
        self.clear();
        self.step = Some(step);

        if let Some(animation) = animation {
            self.apply_initial_state(animation, scene, camera);
        }
        true
    }

    /// Loads `animation` and poses everything at `t = 0` without playing.
    ///
    /// If the model is not available yet the pose is deferred until
    /// [`apply_pending_initial_state`](Self::apply_pending_initial_state).
    pub fn apply_initial_state(
        &mut self,
        animation: Arc<StepAnimation>,
        scene: Option<&mut Scene>,
        camera: &mut Camera,
    ) {
        self.cancel();
        self.clock.reset();
        self.load(animation);

        match scene {
            Some(scene) => {
                self.apply_pose_at(0.0, scene, camera);
                self.pending_initial_state = false;
            }
            None => self.pending_initial_state = true,
        }
    }

    /// Applies a deferred initial state once the model has loaded.
    ///
    /// Returns `true` if a pose was applied.
    pub fn apply_pending_initial_state(&mut self, scene: &mut Scene, camera: &mut Camera) -> bool {
        if !self.pending_initial_state || self.clock.state() != PlaybackState::Idle {
            return false;
        }
        self.pending_initial_state = false;
        self.apply_pose_at(0.0, scene, camera);
        true
    }

    /// Loads `animation` and starts playing it from `t = 0`.
    ///
    /// Animations without any keyframes leave the pose alone and do not start
    /// the clock; `None` is returned in that case.
    pub fn apply_step_animation(&mut self, animation: Arc<StepAnimation>) -> Option<TickHandle> {
        self.cancel();
        self.load(animation);
        self.start()
    }

    /// Cancels the current run and plays the loaded animation again from zero.
    pub fn restart(&mut self) -> Option<TickHandle> {
        self.cancel();
        if self.animation.is_none() {
            return None;
        }
        self.start()
    }

    /// Retires the current tick handle. The clock state is left as is.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.active = None;
    }

    /// Drops the step, its animation and all playback state.
    pub fn unmount(&mut self) {
        self.clear();
    }

    /// Forgets resolved nodes, e.g. after the model was replaced in place.
    pub fn invalidate_bindings(&mut self) {
        self.binder.clear();
    }

    // ========================================================================
    // Frame tick
    // ========================================================================

    /// Advances the run identified by `handle` by `delta` seconds and applies
    /// the resulting poses.
    ///
    /// No-op for stale handles and while the model is not loaded (the clock
    /// does not advance either). Objects are applied first, then the camera.
    pub fn tick(
        &mut self,
        handle: TickHandle,
        scene: Option<&mut Scene>,
        camera: &mut Camera,
        delta: f32,
    ) -> Option<PlaybackEvent> {
        if self.active != Some(handle) {
            return None;
        }
        let scene = scene?;

        let event = self.clock.tick(delta);
        self.apply_pose_at(self.clock.current_time(), scene, camera);

        match event {
            Some(ClockEvent::Completed) => {
                self.active = None;
                let event = PlaybackEvent::Completed {
                    step: self.step.clone(),
                };
                log::debug!(
                    "Step animation completed after {:.3}s",
                    self.clock.current_time()
                );
                if let Some(listener) = self.on_complete.as_mut() {
                    listener(&event);
                }
                Some(event)
            }
            None => None,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[must_use]
    pub fn current_step(&self) -> Option<&StepId> {
        self.step.as_ref()
    }

    #[must_use]
    pub fn animation(&self) -> Option<&Arc<StepAnimation>> {
        self.animation.as_ref()
    }

    /// Authoring problems found when the current animation was loaded.
    #[must_use]
    pub fn issues(&self) -> &[AnimationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.clock.state()
    }

    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.clock.current_time()
    }

    #[must_use]
    pub fn active_handle(&self) -> Option<TickHandle> {
        self.active
    }

    /// Forward navigation is suppressed while an animation is in flight.
    #[must_use]
    pub fn is_navigation_locked(&self) -> bool {
        self.clock.is_playing()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn clear(&mut self) {
        self.cancel();
        self.clock.reset();
        self.step = None;
        self.animation = None;
        self.issues.clear();
        self.tracks.clear();
        self.camera_track = CameraTrack::new(Vec::new());
        self.camera_cursor = KeyframeCursor::default();
        self.binder.clear();
        self.pending_initial_state = false;
    }

    fn load(&mut self, animation: Arc<StepAnimation>) {
        // Replaying the loaded animation only rewinds the cursors.
        if self
            .animation
            .as_ref()
            .is_some_and(|loaded| Arc::ptr_eq(loaded, &animation))
        {
            for bound in &mut self.tracks {
                bound.cursor = KeyframeCursor::default();
            }
            self.camera_cursor = KeyframeCursor::default();
            return;
        }

        self.issues = animation.validate();
        for issue in &self.issues {
            log::warn!("Step animation issue: {issue:?}");
        }

        self.tracks = animation
            .object_ids()
            .into_iter()
            .map(|object_id| BoundTrack {
                object_id: object_id.to_owned(),
                track: ObjectTrack::new(
                    animation
                        .object_keyframes
                        .iter()
                        .filter(|k| k.object_id == object_id && k.transform.is_finite())
                        .cloned(),
                ),
                cursor: KeyframeCursor::default(),
            })
            .filter(|bound| !bound.track.is_empty())
            .collect();

        self.camera_track = CameraTrack::new(
            animation
                .camera_keyframes
                .iter()
                .filter(|k| k.position.is_finite() && k.target.is_finite())
                .cloned(),
        );
        self.camera_cursor = KeyframeCursor::default();
        self.animation = Some(animation);
    }

    fn start(&mut self) -> Option<TickHandle> {
        let animation = self.animation.as_ref()?;
        if self.tracks.is_empty() && self.camera_track.is_empty() {
            log::debug!("Step animation has no keyframes, nothing to play");
            self.clock.reset();
            return None;
        }

        self.clock.start(animation.playback_duration());
        self.pending_initial_state = false;
        let handle = TickHandle {
            generation: self.generation,
        };
        self.active = Some(handle);
        Some(handle)
    }

    fn apply_pose_at(&mut self, time: f32, scene: &mut Scene, camera: &mut Camera) {
        let fade = self.options.fade;
        for bound in &mut self.tracks {
            let Some(node) = self.binder.resolve(scene, &bound.object_id) else {
                continue;
            };
            if let Some(sample) = evaluate_with_cursor(&bound.track, time, &mut bound.cursor, fade) {
                apply_sample(scene, node, &sample);
            }
        }

        if self.options.animate_camera
            && let Some(pose) =
                evaluate_camera_with_cursor(&self.camera_track, time, &mut self.camera_cursor)
        {
            camera.set_view(pose.position, pose.target);
        }
    }
}

fn apply_sample(scene: &mut Scene, handle: NodeHandle, sample: &PoseSample) {
    let Some(node) = scene.get_node_mut(handle) else {
        return;
    };
    node.transform
        .set_pose(sample.position, sample.rotation, sample.scale);
    node.visible = sample.visible;
    scene.set_subtree_opacity(handle, sample.opacity);
}
