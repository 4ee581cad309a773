/// Lifecycle of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No continuous playback; the step may show its `t = 0` pose.
    #[default]
    Idle,
    Playing,
    /// Reached the end; stays here until restarted or reset.
    Completed,
}

/// One-shot notifications produced by [`PlaybackClock::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Completed,
}

/// Playback time of a step animation.
///
/// Time only advances while [`PlaybackState::Playing`] and is clamped to the
/// duration. Deltas come from measured wall-clock time, so irregular frame
/// spacing converges to the same end state as a fixed cadence.
#[derive(Debug, Clone, Default)]
pub struct PlaybackClock {
    state: PlaybackState,
    current_time: f32,
    duration: f32,
}

impl PlaybackClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a run of `duration` seconds from zero.
    pub fn start(&mut self, duration: f32) {
        self.duration = sanitize(duration);
        self.current_time = 0.0;
        self.state = PlaybackState::Playing;
    }

    /// Advances by `delta` seconds. Returns [`ClockEvent::Completed`] exactly
    /// once per run, on the tick that reaches the duration.
    pub fn tick(&mut self, delta: f32) -> Option<ClockEvent> {
        if self.state != PlaybackState::Playing {
            return None;
        }

        self.current_time = (self.current_time + sanitize(delta)).min(self.duration);

        if self.current_time >= self.duration {
            self.state = PlaybackState::Completed;
            return Some(ClockEvent::Completed);
        }
        None
    }

    /// Back to `Playing` from zero, whatever the current state.
    pub fn restart(&mut self) {
        self.current_time = 0.0;
        self.state = PlaybackState::Playing;
    }

    /// Back to `Idle` at zero; the duration is kept.
    pub fn reset(&mut self) {
        self.current_time = 0.0;
        self.state = PlaybackState::Idle;
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    #[must_use]
    pub fn has_completed(&self) -> bool {
        self.state == PlaybackState::Completed
    }
}

fn sanitize(seconds: f32) -> f32 {
    if seconds.is_finite() && seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}
