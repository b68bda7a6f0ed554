//! Frame timing for the scenario loop.

use std::time::{Duration, Instant};

/// Tracks per-frame delta, total run time and frames per second.
#[derive(Debug)]
pub struct Timer {
    last: Instant,
    delta: f32,
    total: f32,
    /// Frames counted since the last whole second.
    frames: u32,
    /// Time accumulated toward the next whole second.
    window: f32,
    fps: u32,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Starts timing now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
            delta: 0.0,
            total: 0.0,
            frames: 0,
            window: 0.0,
            fps: 0,
        }
    }

    /// Measures the time since the previous call and advances.
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.advance(elapsed.as_secs_f32());
    }

    /// Advances by a fixed step without reading the clock.
    pub fn advance(&mut self, delta: f32) {
        self.delta = delta;
        self.total += delta;
        self.frames += 1;
        self.window += delta;
        if self.window >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window -= 1.0;
        }
    }

    /// Seconds covered by the last frame.
    #[inline]
    #[must_use]
    pub const fn delta(&self) -> f32 {
        self.delta
    }

    /// Seconds since the timer started.
    #[inline]
    #[must_use]
    pub const fn total(&self) -> f32 {
        self.total
    }

    /// Frames completed during the last whole second.
    #[inline]
    #[must_use]
    pub const fn fps(&self) -> u32 {
        self.fps
    }

    /// Total run time as a [`Duration`].
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f32(self.total)
    }
}
