//! Detection snapshots
//!
//! A snapshot is the interpreted output of one detector pass. Absences
//! (no finger, no hands, no face) are valid values, not errors: they simply
//! suppress the corresponding trigger for that frame.

use crate::VideoPoint;

/// Immutable per-frame detection result, produced once per processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetectionSnapshot {
    /// Mouth open beyond the breath threshold this frame.
    pub mouth_open: bool,
    /// Index finger tip in video space, already mirrored. Absent when no
    /// hand was detected.
    pub index_finger: Option<VideoPoint>,
    /// At least two hands in frame (bare count, no hand identity).
    pub two_hands: bool,
}

impl DetectionSnapshot {
    /// The neutral "nothing detected" snapshot, also substituted on
    /// detector faults.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        !self.mouth_open && self.index_finger.is_none() && !self.two_hands
    }
}

/// Coarse detection booleans for indicator UI, published on the
/// low-frequency channel. Lag here is acceptable by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetectionFlags {
    pub mouth_open: bool,
    pub finger_detected: bool,
    pub two_hands: bool,
}
