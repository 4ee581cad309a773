use crate::animation::keyframe::{CameraKeyframe, ObjectKeyframe};

/// Forward scan length before falling back to binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// Anything with a timestamp in seconds.
pub trait Timed {
    fn time(&self) -> f32;
}

impl Timed for ObjectKeyframe {
    #[inline]
    fn time(&self) -> f32 {
        self.time
    }
}

impl Timed for CameraKeyframe {
    #[inline]
    fn time(&self) -> f32 {
        self.time
    }
}

/// Remembers the last bracket so monotonic playback finds the next one in O(1).
#[derive(Debug, Clone, Default)]
pub struct KeyframeCursor {
    pub last_index: usize,
}

/// The keyframes surrounding a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bracket<'a, K> {
    /// Query time is before the first keyframe, or the track is empty.
    NotStarted,
    /// Query time is at or after the last keyframe: hold its pose.
    Hold(&'a K),
    /// `prev.time <= t < next.time`, `factor` in `[0, 1]`.
    Between { prev: &'a K, next: &'a K, factor: f32 },
}

/// Keyframes of one object (or the camera) sorted by time.
///
/// Sorting is stable, so keyframes sharing a timestamp keep their authored
/// order and the later one acts as `prev` once that time is reached.
#[derive(Debug, Clone)]
pub struct KeyframeTrack<K> {
    keys: Vec<K>,
}

pub type ObjectTrack = KeyframeTrack<ObjectKeyframe>;
pub type CameraTrack = KeyframeTrack<CameraKeyframe>;

impl<K: Timed> KeyframeTrack<K> {
    /// Builds a track from keyframes in any order.
    ///
    /// Keyframes with a non-finite or negative time are dropped.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = K>) -> Self {
        let mut keys: Vec<K> = keys
            .into_iter()
            .filter(|k| {
                let keep = k.time().is_finite() && k.time() >= 0.0;
                if !keep {
                    log::warn!("Dropping keyframe with invalid time {}", k.time());
                }
                keep
            })
            .collect();
        keys.sort_by(|a, b| a.time().total_cmp(&b.time()));
        Self { keys }
    }

    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Time of the last keyframe, or zero for an empty track.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.keys.last().map_or(0.0, Timed::time)
    }

    /// Stateless bracket lookup (binary search).
    #[must_use]
    pub fn bracket(&self, time: f32) -> Bracket<'_, K> {
        let next_idx = self.keys.partition_point(|k| k.time() <= time);
        self.bracket_at(next_idx, time)
    }

    /// Bracket lookup that reuses and updates `cursor`.
    pub fn bracket_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Bracket<'_, K> {
        let next_idx = self.locate(time, cursor);
        self.bracket_at(next_idx, time)
    }

    /// Index of the first keyframe with `time > t` (equivalently, the number
    /// of keyframes at or before `t`).
    fn locate(&self, time: f32, cursor: &mut KeyframeCursor) -> usize {
        let len = self.keys.len();
        if len == 0 {
            return 0;
        }

        let start = cursor.last_index.min(len - 1);
        if self.keys[start].time() <= time {
            // Every idx visited satisfies keys[idx].time <= time.
            let end = (start + MAX_SCAN_OFFSET + 1).min(len);
            for idx in start..end {
                if idx + 1 == len || time < self.keys[idx + 1].time() {
                    cursor.last_index = idx;
                    return idx + 1;
                }
            }
        }

        // Large jump, rewind or restart.
        let next_idx = self.keys.partition_point(|k| k.time() <= time);
        cursor.last_index = next_idx.saturating_sub(1);
        next_idx
    }

    fn bracket_at(&self, next_idx: usize, time: f32) -> Bracket<'_, K> {
        if next_idx == 0 {
            return Bracket::NotStarted;
        }
        let prev = &self.keys[next_idx - 1];
        let Some(next) = self.keys.get(next_idx) else {
            return Bracket::Hold(prev);
        };

        // `prev.time <= time < next.time`, so `time == prev.time` is exactly 0
        // however small the span is.
        let span = next.time() - prev.time();
        let factor = if time <= prev.time() {
            0.0
        } else if span > 0.0 {
            ((time - prev.time()) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        Bracket::Between { prev, next, factor }
    }
}
