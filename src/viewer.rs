//! Viewer Module
//!
//! [`Viewer`] ties the loaded model, the camera and the
//! [`StepAnimationController`] to a frame driver. It holds no window or GPU
//! state, so it can sit behind any frontend that delivers frame callbacks and
//! user actions.
//!
//! # Lifecycle
//!
//! 1. Create with [`Viewer::new`]
//! 2. Start the asset load elsewhere; hand the result to [`Viewer::on_model_loaded`]
//! 3. Open a step with [`Viewer::open_step`] (shows its `t = 0` pose)
//! 4. [`Viewer::play`] / [`Viewer::restart`] on user request
//! 5. Call [`Viewer::frame`] from every frame callback, then draw
//!
//! ```rust,ignore
//! let mut viewer = Viewer::new(ViewerSettings::default());
//! viewer.on_model_loaded(load_model("cabinet.glb"));
//! viewer.open_step(&steps[0]);
//! viewer.play();
//! loop {
//!     let report = viewer.frame(Instant::now());
//!     if report.completed.is_some() {
//!         enable_next_button();
//!     }
//! }
//! ```

use crate::animation::{PlaybackEvent, PlaybackState, Step, StepAnimationController, TickHandle};
use crate::errors::Result;
use crate::scene::{Camera, Scene};
use crate::settings::ViewerSettings;
use crate::utils::time::{FrameTimer, Instant};

/// Availability of the model asset.
#[derive(Default)]
pub enum ModelState {
    #[default]
    Loading,
    Ready(Scene),
    Failed(String),
}

/// What happened during one [`Viewer::frame`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Seconds fed to the playback clock this frame.
    pub delta: f32,
    /// Set on the frame a run completes.
    pub completed: Option<PlaybackEvent>,
    /// Nodes whose world matrix was recomputed for drawing.
    pub world_updates: usize,
}

pub struct Viewer {
    settings: ViewerSettings,
    model: ModelState,
    pub camera: Camera,
    controller: StepAnimationController,
    timer: FrameTimer,
    tick: Option<TickHandle>,
    frame_count: u64,
}

impl Viewer {
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        let controller = StepAnimationController::new(settings.controller_options());
        let camera = Camera::new_perspective(settings.camera_fov, 16.0 / 9.0, 0.1, 1000.0);
        Self {
            settings,
            model: ModelState::Loading,
            camera,
            controller,
            timer: FrameTimer::new(),
            tick: None,
            frame_count: 0,
        }
    }

    // ========================================================================
    // Model
    // ========================================================================

    /// Receives the result of the external model load.
    ///
    /// On success any deferred initial state is applied; on failure the error
    /// is kept for display and the viewer stays non-animated.
    pub fn on_model_loaded(&mut self, result: Result<Scene>) {
        match result {
            Ok(mut scene) => {
                log::info!("Model loaded ({} nodes)", scene.nodes.len());
                self.controller.invalidate_bindings();
                self.controller
                    .apply_pending_initial_state(&mut scene, &mut self.camera);
                self.model = ModelState::Ready(scene);
            }
            Err(err) => {
                log::error!("Model failed to load: {err}");
                self.model = ModelState::Failed(err.to_string());
            }
        }
    }

    #[must_use]
    pub fn model_state(&self) -> &ModelState {
        &self.model
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        match &self.model {
            ModelState::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        match &mut self.model {
            ModelState::Ready(scene) => Some(scene),
            _ => None,
        }
    }

    // ========================================================================
    // Steps and playback
    // ========================================================================

    /// Opens `step`, showing its initial pose without playing.
    ///
    /// Re-opening the current step is a no-op.
    pub fn open_step(&mut self, step: &Step) -> bool {
        let scene = match &mut self.model {
            ModelState::Ready(scene) => Some(scene),
            _ => None,
        };
        let changed = self.controller.set_current_step(
            step.id.clone(),
            step.animation.clone(),
            scene,
            &mut self.camera,
        );
        if changed {
            self.tick = None;
        }
        changed
    }

    /// Plays the current step's animation from the start.
    ///
    /// Returns `false` when there is nothing to play.
    pub fn play(&mut self) -> bool {
        let Some(animation) = self.controller.animation().cloned() else {
            return false;
        };
        self.tick = self.controller.apply_step_animation(animation);
        self.tick.is_some()
    }

    /// Cancels the current run and plays again from zero.
    pub fn restart(&mut self) -> bool {
        self.tick = self.controller.restart();
        self.tick.is_some()
    }

    /// Tears down playback and forgets the step.
    pub fn unmount(&mut self) {
        self.controller.unmount();
        self.tick = None;
        self.timer.reset();
    }

    // ========================================================================
    // Frame driver
    // ========================================================================

    /// Frame callback driven by wall-clock time.
    pub fn frame(&mut self, now: Instant) -> FrameReport {
        let mut delta = self.timer.tick_at(now).as_secs_f32();
        if let Some(max) = self.settings.max_frame_delta {
            delta = delta.min(max);
        }
        self.advance(delta)
    }

    /// Frame callback with an explicit delta in seconds.
    ///
    /// Animation runs first (objects, then camera), then world matrices are
    /// refreshed for drawing. Drawing itself happens every frame regardless
    /// of the playback state.
    pub fn advance(&mut self, delta: f32) -> FrameReport {
        let mut report = FrameReport {
            delta,
            ..FrameReport::default()
        };

        let scene = match &mut self.model {
            ModelState::Ready(scene) => Some(scene),
            _ => None,
        };

        if let Some(handle) = self.tick {
            report.completed = self
                .controller
                .tick(handle, scene, &mut self.camera, delta);
            // Completed or cancelled: stop scheduling this run.
            if self.controller.active_handle() != Some(handle) {
                self.tick = None;
            }
        }

        if let ModelState::Ready(scene) = &mut self.model {
            report.world_updates = scene.update_world_matrices();
        }
        self.camera.transform.update_local_matrix();
        self.frame_count += 1;
        report
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Whether the host may enable "next step" navigation.
    #[must_use]
    pub fn can_navigate_forward(&self) -> bool {
        !self.controller.is_navigation_locked()
    }

    #[must_use]
    pub fn playback_state(&self) -> PlaybackState {
        self.controller.playback_state()
    }

    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.controller.current_time()
    }

    #[must_use]
    pub fn controller(&self) -> &StepAnimationController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut StepAnimationController {
        &mut self.controller
    }

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerSettings::default())
    }
}
