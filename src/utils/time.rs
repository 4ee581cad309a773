#[cfg(not(target_arch = "wasm32"))]
pub use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
pub use web_time::{Duration, Instant};

/// Measures wall-clock time between frame callbacks.
///
/// The first tick after creation or [`FrameTimer::reset`] yields a zero
/// delta, so time spent before the driver started is never counted.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_update: Option<Instant>,
    /// Time since the previous tick
    pub delta: Duration,
    /// Sum of all deltas since the last reset
    pub elapsed: Duration,
    /// Number of ticks since the last reset
    pub frame_count: u64,
}

impl FrameTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a frame callback at `now` and returns the measured delta.
    pub fn tick_at(&mut self, now: Instant) -> Duration {
        self.delta = match self.last_update {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.elapsed += self.delta;
        self.last_update = Some(now);
        self.frame_count += 1;
        self.delta
    }

    /// Same as [`FrameTimer::tick_at`] with the current instant.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
