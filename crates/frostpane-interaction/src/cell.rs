//! High-frequency signal cell
//!
//! Per-frame motion data must never pass through a channel that may
//! coalesce or defer updates. The cell is the direct path: the state
//! machine's owner writes it once per processed frame, each render loop
//! reads it at the top of each iteration, and a reader always sees the most
//! recent fully-written value.
//!
//! Single-writer/multi-reader is enforced by ownership: `MotionWriter` does
//! not clone, `MotionReader` does.

use std::sync::Arc;

use frostpane_core::{InteractionState, MotionSignal};
use parking_lot::RwLock;

/// The value published each frame: the motion signal plus the coarse state
/// and fog opacity the render loops gate on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameSignals {
    pub motion: MotionSignal,
    pub state: InteractionState,
    pub fog_opacity: f32,
}

/// Create a connected writer/reader pair.
pub fn motion_cell() -> (MotionWriter, MotionReader) {
    let cell = Arc::new(RwLock::new(FrameSignals::default()));
    (
        MotionWriter { cell: cell.clone() },
        MotionReader { cell },
    )
}

/// The single writer. Held by whatever owns the state machine.
pub struct MotionWriter {
    cell: Arc<RwLock<FrameSignals>>,
}

impl MotionWriter {
    /// Overwrite the published value. Earlier values are gone; only the
    /// latest matters.
    pub fn publish(&self, signals: FrameSignals) {
        *self.cell.write() = signals;
    }

    /// Hand out another reader.
    pub fn reader(&self) -> MotionReader {
        MotionReader {
            cell: self.cell.clone(),
        }
    }
}

/// A read handle for render loops.
#[derive(Clone)]
pub struct MotionReader {
    cell: Arc<RwLock<FrameSignals>>,
}

impl MotionReader {
    /// The most recent fully-written value.
    pub fn latest(&self) -> FrameSignals {
        *self.cell.read()
    }
}
