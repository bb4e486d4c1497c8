//! Stationary pointer ticker.
//!
//! When the scene animates under a pointer that does not move, hover state
//! goes stale. [`EventsTicker`] counts frame time since the last real pointer
//! move and tells the event system when to replay one.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct EventsTicker {
    interval: Duration,
    elapsed: Duration,
    paused: bool,
    active: bool,
}

impl EventsTicker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            elapsed: Duration::ZERO,
            paused: false,
            active: true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// A real pointer move happened; start counting again.
    pub fn did_move(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Stop counting until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Detach from the frame clock. Only [`restart`](Self::restart) undoes this.
    pub fn cancel(&mut self) {
        self.active = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn restart(&mut self) {
        self.active = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Add one frame's worth of time. Returns `true` when a replay is due,
    /// and starts counting again from zero.
    pub fn advance(&mut self, delta: Duration) -> bool {
        if !self.active || self.paused {
            return false;
        }
        self.elapsed += delta;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = Duration::ZERO;
        true
    }
}
