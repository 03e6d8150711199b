//! Raw landmarks and their interpretation
//!
//! What the detector returns is raw: a jaw-open blendshape score and zero or
//! more hands as landmark lists. Interpretation into a `DetectionSnapshot`
//! is fixed by contract:
//!
//! - mouth open when the jaw-open score exceeds 0.4
//! - two hands is the bare count `hands.len() >= 2`, no identity tracking
//! - the draw finger is landmark 8 (index tip) of the first hand, with x
//!   mirrored to match the mirrored self-view

use frostpane_core::{DetectionSnapshot, VideoPoint};

/// Landmark index of the index-finger tip within a hand landmark list.
pub const INDEX_FINGER_TIP: usize = 8;

/// Jaw-open blendshape score above which the mouth counts as open.
pub const JAW_OPEN_THRESHOLD: f32 = 0.4;

/// One detected hand: landmark positions in video space, unmirrored.
#[derive(Debug, Clone, Default)]
pub struct HandLandmarks {
    pub points: Vec<VideoPoint>,
}

impl HandLandmarks {
    pub fn new(points: Vec<VideoPoint>) -> Self {
        Self { points }
    }

    /// The index-finger tip, if the landmark list is complete enough.
    pub fn index_finger_tip(&self) -> Option<VideoPoint> {
        self.points.get(INDEX_FINGER_TIP).copied()
    }
}

/// Raw output of one detector pass, before interpretation.
#[derive(Debug, Clone, Default)]
pub struct RawDetection {
    /// Jaw-open blendshape score, `[0,1]`. Zero when no face was found.
    pub jaw_open: f32,
    /// Detected hands, primary hand first.
    pub hands: Vec<HandLandmarks>,
}

impl RawDetection {
    /// Nothing detected: no face, no hands.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Apply the interpretation contract.
    pub fn interpret(&self) -> DetectionSnapshot {
        let index_finger = self
            .hands
            .first()
            .and_then(HandLandmarks::index_finger_tip)
            .map(VideoPoint::mirrored);

        DetectionSnapshot {
            mouth_open: self.jaw_open > JAW_OPEN_THRESHOLD,
            index_finger,
            two_hands: self.hands.len() >= 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand_with_tip(x: f32, y: f32) -> HandLandmarks {
        // Landmarks 0..=8, tip last.
        let mut points = vec![VideoPoint::default(); INDEX_FINGER_TIP];
        points.push(VideoPoint::new(x, y));
        HandLandmarks::new(points)
    }

    #[test]
    fn test_empty_interprets_to_empty_snapshot() {
        assert!(RawDetection::empty().interpret().is_empty());
    }

    #[test]
    fn test_jaw_threshold_boundary() {
        let mut raw = RawDetection::empty();

        raw.jaw_open = 0.4;
        assert!(!raw.interpret().mouth_open);

        raw.jaw_open = 0.41;
        assert!(raw.interpret().mouth_open);
    }

    #[test]
    fn test_finger_is_mirrored() {
        let raw = RawDetection {
            jaw_open: 0.0,
            hands: vec![hand_with_tip(0.2, 0.6)],
        };

        let finger = raw.interpret().index_finger.unwrap();
        assert!((finger.x - 0.8).abs() < f32::EPSILON);
        assert_eq!(finger.y, 0.6);
    }

    #[test]
    fn test_two_hands_is_bare_count() {
        let one = RawDetection {
            jaw_open: 0.0,
            hands: vec![hand_with_tip(0.5, 0.5)],
        };
        let two = RawDetection {
            jaw_open: 0.0,
            hands: vec![hand_with_tip(0.5, 0.5), hand_with_tip(0.1, 0.1)],
        };

        assert!(!one.interpret().two_hands);
        assert!(two.interpret().two_hands);
    }

    #[test]
    fn test_short_landmark_list_yields_no_finger() {
        let raw = RawDetection {
            jaw_open: 0.9,
            hands: vec![HandLandmarks::new(vec![VideoPoint::default(); 3])],
        };

        let snap = raw.interpret();
        assert!(snap.mouth_open);
        assert!(snap.index_finger.is_none());
    }
}
