//! Fog opacity fade
//!
//! The presentation layer animates fog opacity toward a per-state target
//! over a fixed duration. The state machine treats that value as an input
//! (the Fogging → Drawing threshold), so the animation is modeled here
//! behaviorally: a full-scale linear approach, stepped once per frame.

use std::time::Duration;

/// Eases the current opacity toward a target at a fixed full-scale rate.
#[derive(Debug, Clone)]
pub struct FogFade {
    current: f32,
    target: f32,
    /// Time for a full 0 → 1 sweep.
    duration: Duration,
}

impl FogFade {
    pub fn new(duration: Duration) -> Self {
        FogFade {
            current: 0.0,
            target: 0.0,
            duration,
        }
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target.clamp(0.0, 1.0);
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_settled(&self) -> bool {
        (self.current - self.target).abs() < f32::EPSILON
    }

    /// Advance the animation by one frame's elapsed time.
    pub fn step(&mut self, dt: Duration) {
        if self.duration.is_zero() {
            self.current = self.target;
            return;
        }

        let rate = dt.as_secs_f32() / self.duration.as_secs_f32();
        let delta = self.target - self.current;

        if delta.abs() <= rate {
            self.current = self.target;
        } else {
            self.current += rate * delta.signum();
        }
    }
}

impl Default for FogFade {
    fn default() -> Self {
        // Matches the presentation layer's one-second opacity transition.
        FogFade::new(Duration::from_millis(1000))
    }
}
