//! Fault-tolerant perception adapter
//!
//! The adapter is the only thing that calls the detector. Guarantees to the
//! frame loop:
//!
//! - detector errors never propagate: they become the neutral snapshot,
//!   logged as a warning
//! - `initialize` is idempotent
//! - a timestamp that fails the strictly-increasing contract is refused
//!   (neutral snapshot) rather than handed to the detector
//!
//! Detection absence is not a fault. A fault is the detector failing to
//! answer at all.

use frostpane_core::{DetectionSnapshot, FrameTime, PaneError, PaneResult};
use tracing::warn;

use crate::{Detector, Frame};

/// Wraps a detector into the failure semantics the frame loop relies on.
pub struct PerceptionAdapter<D: Detector> {
    inner: D,
    initialized: bool,
    last_timestamp: Option<FrameTime>,
    faults: u64,
}

impl<D: Detector> PerceptionAdapter<D> {
    pub fn new(inner: D) -> Self {
        PerceptionAdapter {
            inner,
            initialized: false,
            last_timestamp: None,
            faults: 0,
        }
    }

    /// Initialize the detector. Safe to call more than once; only the first
    /// call reaches the detector.
    pub fn initialize(&mut self) -> PaneResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.inner.initialize()?;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Detector faults recovered so far.
    pub fn fault_count(&self) -> u64 {
        self.faults
    }

    /// Run one detection pass. Always returns a snapshot; degraded paths
    /// return `DetectionSnapshot::empty()`.
    pub fn snapshot(&mut self, frame: &Frame, timestamp: FrameTime) -> DetectionSnapshot {
        if !self.initialized {
            self.record_fault(&PaneError::DetectorNotReady);
            return DetectionSnapshot::empty();
        }

        if let Some(last) = self.last_timestamp {
            if timestamp <= last {
                self.record_fault(&PaneError::NonMonotonicFrame {
                    last,
                    got: timestamp,
                });
                return DetectionSnapshot::empty();
            }
        }
        self.last_timestamp = Some(timestamp);

        match self.inner.detect(frame, timestamp) {
            Ok(raw) => raw.interpret(),
            Err(err) => {
                self.record_fault(&err);
                DetectionSnapshot::empty()
            }
        }
    }

    fn record_fault(&mut self, err: &PaneError) {
        self.faults += 1;
        warn!(error = %err, "detection fault, substituting empty snapshot");
    }
}
