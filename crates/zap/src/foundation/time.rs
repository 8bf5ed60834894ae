//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer driving the main loop
///
/// `update` is called once per loop iteration; the resulting delta is handed
/// to every window update callback.
#[derive(Debug)]
pub struct Timer {
    started: Instant,
    last_frame: Instant,
    delta_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_frame: now,
            delta_time: 0.0,
            frame_count: 0,
        }
    }

    /// Restart the clock, as if the timer had just been created
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one frame and return the time since the previous frame in seconds
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Time between the two most recent `update` calls, in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Number of completed frames
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Wall-clock time since the timer started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Milliseconds since the timer started
    pub fn ticks(&self) -> u64 {
        u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}
