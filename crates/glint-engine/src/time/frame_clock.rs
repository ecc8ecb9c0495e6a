use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots.
///
/// With an interval set, the clock also paces the loop: the runtime waits
/// until [`next_deadline`](Self::next_deadline) before requesting a redraw.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    interval: Option<Duration>,
}

impl FrameClock {
    /// Creates an unpaced clock.
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            frame_index: 0,
            interval: None,
        }
    }

    /// Creates a clock that paces frames at least `interval` apart.
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval: Some(interval).filter(|d| !d.is_zero()),
            ..Self::new()
        }
    }

    /// Earliest instant the next frame should start, if pacing is enabled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.interval.map(|d| self.last + d)
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        self.last = now;

        let ft = FrameTime {
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
