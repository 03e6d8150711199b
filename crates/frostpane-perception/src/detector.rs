//! Detector trait - the external collaborator boundary
//!
//! Model loading, inference and GPU delegate selection all live behind this
//! trait. Implementations must return within the caller's frame budget; they
//! may fail, and the adapter recovers.

use frostpane_core::{FrameTime, PaneResult};

use crate::{Frame, RawDetection};

/// A face/hand landmark detector.
pub trait Detector {
    /// Load models and warm up. Must complete before the frame loop starts
    /// consuming detections. Called through the adapter, which makes it
    /// idempotent.
    fn initialize(&mut self) -> PaneResult<()>;

    /// Run detection on a decoded frame. `timestamp` is strictly increasing
    /// across calls (the runtime's video clock guarantees it).
    fn detect(&mut self, frame: &Frame, timestamp: FrameTime) -> PaneResult<RawDetection>;
}

/// Detector that never detects anything. Stands in when no camera pipeline
/// is wired up.
#[derive(Debug, Default)]
pub struct NullDetector;

impl Detector for NullDetector {
    fn initialize(&mut self) -> PaneResult<()> {
        Ok(())
    }

    fn detect(&mut self, _frame: &Frame, _timestamp: FrameTime) -> PaneResult<RawDetection> {
        Ok(RawDetection::empty())
    }
}
