//! High-frequency motion signal
//!
//! The per-frame output the render loops consume. Published by overwrite,
//! never queued: only the latest value matters.

use crate::DisplayPoint;

/// Draw/snow signal for one frame.
///
/// Invariant: the two are mutually exclusive in effect. When two hands are
/// raised the state machine suppresses `draw_point` regardless of finger
/// detection, so a frame never both erases fog and spawns snow.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSignal {
    /// "Erase here this frame", display space. Absent when not drawing.
    pub draw_point: Option<DisplayPoint>,
    /// Snow spawning enabled this frame.
    pub snow_active: bool,
}

impl MotionSignal {
    /// No drawing, no snow.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn drawing(point: Option<DisplayPoint>) -> Self {
        Self {
            draw_point: point,
            snow_active: false,
        }
    }

    pub fn snowing() -> Self {
        Self {
            draw_point: None,
            snow_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowing_suppresses_draw() {
        let signal = MotionSignal::snowing();

        assert!(signal.draw_point.is_none());
        assert!(signal.snow_active);
    }

    #[test]
    fn test_drawing_clears_snow() {
        let signal = MotionSignal::drawing(Some(DisplayPoint::CENTER));

        assert!(signal.draw_point.is_some());
        assert!(!signal.snow_active);
    }
}
