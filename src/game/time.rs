//! Simulation clock
//!
//! Real frame time goes in, simulation time comes out. A hit-stop pause
//! zeroes the simulation delta for a stretch of real time while the host
//! keeps rendering and polling input.

#[derive(Debug, Clone, Default)]
pub struct Time {
    /// Simulation seconds elapsed this frame (0 while paused)
    pub delta: f32,
    /// Real seconds elapsed this frame
    pub raw_delta: f32,
    /// Total simulation seconds
    pub elapsed: f64,
    /// Simulation seconds before this frame
    pub previous_elapsed: f64,
    pause_timer: f32,
}

impl Time {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one host frame.
    pub fn advance(&mut self, raw_delta: f32) {
        self.raw_delta = raw_delta;
        self.previous_elapsed = self.elapsed;

        if self.pause_timer > 0.0 {
            self.pause_timer -= raw_delta;
            self.delta = 0.0;
        } else {
            self.delta = raw_delta;
            self.elapsed += raw_delta as f64;
        }
    }

    /// Freeze simulation for `duration` real seconds. Overlapping pauses
    /// keep the longer remaining time.
    pub fn pause_for(&mut self, duration: f32) {
        self.pause_timer = self.pause_timer.max(duration);
    }

    pub fn is_paused(&self) -> bool {
        self.pause_timer > 0.0
    }

    /// True on frames where simulation time crossed a multiple of `interval`.
    pub fn on_interval(&self, interval: f32) -> bool {
        if interval <= 0.0 {
            return false;
        }
        let interval = interval as f64;
        (self.previous_elapsed / interval).floor() != (self.elapsed / interval).floor()
    }
}
