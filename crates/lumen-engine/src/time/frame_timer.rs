use std::time::Duration;

/// Floor applied to the frame delta before deriving fps.
///
/// Two samples inside the same clock tick produce a zero delta; fps is then
/// reported as `1 / MIN_FRAME_DELTA` instead of dividing by zero.
pub const MIN_FRAME_DELTA: Duration = Duration::from_micros(100);

/// Timing produced by [`FrameTimer::end`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Raw time since the previous `end` (or since the epoch on the first frame).
    pub delta: Duration,
    /// Accumulated seconds since the epoch. Non-decreasing.
    pub elapsed: f64,
    pub fps: f32,
    /// `1 / fps`, i.e. seconds per frame after the zero-delta floor.
    pub inv_fps: f32,
}

/// Per-loop frame timer.
///
/// The epoch is captured lazily by the first `begin`, so the time spent in
/// initialization is not counted as a frame.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<Duration>,
    elapsed: f64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures the epoch on the first call; later calls are no-ops.
    pub fn begin(&mut self, now: Duration) {
        if self.last.is_none() {
            self.last = Some(now);
        }
    }

    /// Samples `now` and derives delta, elapsed and fps.
    pub fn end(&mut self, now: Duration) -> FrameTime {
        let last = *self.last.get_or_insert(now);
        let delta = now.saturating_sub(last);
        self.last = Some(now);
        self.elapsed += delta.as_secs_f64();

        let fps = 1.0 / delta.max(MIN_FRAME_DELTA).as_secs_f32();

        FrameTime {
            delta,
            elapsed: self.elapsed,
            fps,
            inv_fps: 1.0 / fps,
        }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn has_epoch(&self) -> bool {
        self.last.is_some()
    }
}
