//! Frame pacing
//!
//! One detection pass and one pass per render loop, every display frame,
//! nominally 60Hz. A pass that overruns its budget causes later frames to be
//! skipped, never queued: there is no value in reacting to a stale frame.

use std::time::Duration;

use tokio::time::{interval, Interval, MissedTickBehavior};

/// Nominal display frame interval (~60Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Fixed-interval pacing policy for the detection pass and the render loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramePacer {
    /// Tick interval.
    pub interval: Duration,
}

impl FramePacer {
    pub fn new(interval: Duration) -> Self {
        FramePacer { interval }
    }

    /// Build the ticker. Missed ticks are skipped: an overrunning pass drops
    /// frames instead of bursting through a backlog of stale ones.
    pub fn ticker(&self) -> Interval {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker
    }

    /// Frames per second implied by the interval.
    pub fn rate_hz(&self) -> f64 {
        1.0 / self.interval.as_secs_f64()
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        FramePacer::new(FRAME_INTERVAL)
    }
}
