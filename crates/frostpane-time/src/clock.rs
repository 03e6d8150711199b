//! Clock implementations
//!
//! The state machine never calls `Instant::now()` itself: it receives
//! timestamps through a `Clock`, so every timing property (breath hold,
//! cooldown, reset delay) can be tested frame-by-frame against a manual
//! clock.

use std::sync::Arc;
use std::time::{Duration, Instant};

use frostpane_core::FrameTime;
use parking_lot::Mutex;

/// An injectable source of frame time.
pub trait Clock {
    fn now(&self) -> FrameTime;
}

/// Wall-progress clock.
/// INVARIANT: output never decreases, and never jumps more than the clamp
/// between observations (e.g. after system sleep).
pub struct MonotonicClock {
    value: Mutex<MonotonicInner>,
}

struct MonotonicInner {
    current: FrameTime,
    last_observed: Instant,
}

/// Largest step the clock will report between two observations.
const MAX_STEP: Duration = Duration::from_millis(100);

impl MonotonicClock {
    /// Create a clock starting at zero.
    pub fn new() -> Self {
        MonotonicClock {
            value: Mutex::new(MonotonicInner {
                current: FrameTime::ZERO,
                last_observed: Instant::now(),
            }),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> FrameTime {
        let mut inner = self.value.lock();
        let observed = Instant::now();
        let elapsed = observed.duration_since(inner.last_observed).min(MAX_STEP);

        inner.current = inner.current.saturating_add(elapsed);
        inner.last_observed = observed;
        inner.current
    }
}

/// Hand-advanced clock for deterministic tests. Cloning yields a handle to
/// the same underlying time.
#[derive(Clone)]
pub struct ManualClock {
    value: Arc<Mutex<FrameTime>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(FrameTime::ZERO)
    }

    pub fn starting_at(time: FrameTime) -> Self {
        ManualClock {
            value: Arc::new(Mutex::new(time)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, dt: Duration) {
        let mut value = self.value.lock();
        *value = value.saturating_add(dt);
    }

    /// Move the clock to an absolute time. Only allowed forward.
    pub fn set(&self, time: FrameTime) {
        let mut value = self.value.lock();
        if time > *value {
            *value = time;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> FrameTime {
        *self.value.lock()
    }
}

/// Wraps a clock into the strictly-increasing timestamp source the detector
/// contract requires. Two reads within the same microsecond still produce
/// distinct, ordered stamps.
pub struct VideoClock<C: Clock> {
    inner: C,
    last: Option<FrameTime>,
}

impl<C: Clock> VideoClock<C> {
    pub fn new(inner: C) -> Self {
        VideoClock { inner, last: None }
    }

    /// Next frame timestamp, strictly greater than every previous one.
    pub fn next_frame_time(&mut self) -> FrameTime {
        let now = self.inner.now();
        let stamped = match self.last {
            Some(last) if now <= last => FrameTime::from_micros(last.as_micros() + 1),
            _ => now,
        };
        self.last = Some(stamped);
        stamped
    }

    /// Last issued timestamp, if any.
    pub fn last_frame_time(&self) -> Option<FrameTime> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::new();

        let t1 = clock.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = clock.now();

        assert!(t2 > t1);
    }

    #[test]
    fn test_manual_clock_shared_handles() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        clock.advance(Duration::from_millis(16));

        assert_eq!(handle.now(), FrameTime::from_millis(16));
    }

    #[test]
    fn test_manual_clock_never_rewinds() {
        let clock = ManualClock::starting_at(FrameTime::from_millis(500));

        clock.set(FrameTime::from_millis(100));

        assert_eq!(clock.now(), FrameTime::from_millis(500));
    }

    #[test]
    fn test_video_clock_strictly_increasing() {
        let manual = ManualClock::new();
        let mut video = VideoClock::new(manual.clone());

        // Frozen underlying clock: stamps must still strictly increase.
        let t1 = video.next_frame_time();
        let t2 = video.next_frame_time();
        let t3 = video.next_frame_time();

        assert!(t1 < t2 && t2 < t3);

        manual.advance(Duration::from_millis(16));
        let t4 = video.next_frame_time();
        assert!(t4 > t3);
        assert_eq!(t4, FrameTime::from_millis(16));
    }
}
