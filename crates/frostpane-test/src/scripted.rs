//! Scripted and fault-injecting detectors
//!
//! `ScriptedDetector` replays a queue of raw detections, one per frame, so
//! gesture sequences can be written as data. `FlakyDetector` wraps any
//! detector and fails a seeded fraction of calls, exercising the adapter's
//! recovery path.

use std::collections::VecDeque;
use std::sync::Arc;

use frostpane_core::{FrameTime, PaneError, PaneResult, VideoPoint};
use frostpane_perception::{
    Detector, Frame, HandLandmarks, RawDetection, INDEX_FINGER_TIP,
};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A detection frame with the mouth held open.
pub fn breath_frame() -> RawDetection {
    RawDetection {
        jaw_open: 0.9,
        hands: Vec::new(),
    }
}

/// Nothing detected.
pub fn quiet_frame() -> RawDetection {
    RawDetection::empty()
}

/// One hand with the index tip at the given video-space position
/// (pre-mirror: interpretation flips x).
pub fn finger_frame(x: f32, y: f32) -> RawDetection {
    let mut points = vec![VideoPoint::default(); INDEX_FINGER_TIP];
    points.push(VideoPoint::new(x, y));
    RawDetection {
        jaw_open: 0.0,
        hands: vec![HandLandmarks::new(points)],
    }
}

/// Two hands raised (snow trigger).
pub fn two_hands_frame() -> RawDetection {
    let hand = HandLandmarks::new(vec![VideoPoint::CENTER; INDEX_FINGER_TIP + 1]);
    RawDetection {
        jaw_open: 0.0,
        hands: vec![hand.clone(), hand],
    }
}

/// Replays queued detections one per `detect` call; empty once exhausted.
/// Clones share the queue, so one handle can keep feeding while another
/// sits inside the runtime.
#[derive(Clone, Default)]
pub struct ScriptedDetector {
    queue: Arc<Mutex<VecDeque<RawDetection>>>,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, raw: RawDetection) {
        self.queue.lock().push_back(raw);
    }

    pub fn push_repeated(&self, raw: &RawDetection, frames: usize) {
        let mut queue = self.queue.lock();
        for _ in 0..frames {
            queue.push_back(raw.clone());
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl Detector for ScriptedDetector {
    fn initialize(&mut self) -> PaneResult<()> {
        Ok(())
    }

    fn detect(&mut self, _frame: &Frame, _ts: FrameTime) -> PaneResult<RawDetection> {
        Ok(self
            .queue
            .lock()
            .pop_front()
            .unwrap_or_else(RawDetection::empty))
    }
}

/// Fails a seeded fraction of detect calls.
pub struct FlakyDetector<D: Detector> {
    inner: D,
    fault_rate: f64,
    rng: StdRng,
}

impl<D: Detector> FlakyDetector<D> {
    pub fn with_seed(inner: D, fault_rate: f64, seed: u64) -> Self {
        FlakyDetector {
            inner,
            fault_rate: fault_rate.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<D: Detector> Detector for FlakyDetector<D> {
    fn initialize(&mut self) -> PaneResult<()> {
        self.inner.initialize()
    }

    fn detect(&mut self, frame: &Frame, ts: FrameTime) -> PaneResult<RawDetection> {
        if self.rng.gen_bool(self.fault_rate) {
            return Err(PaneError::DetectorFault("injected fault".into()));
        }
        self.inner.detect(frame, ts)
    }
}
