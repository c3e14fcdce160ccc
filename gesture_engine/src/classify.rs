//! Finger pattern → gesture category.

use hand_pose::{distance, Finger, FingerStates, Handedness, Joint, Landmarks, Point};

/// One frame's gesture, with the measurement its category needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// All five fingers extended.  `anchor` is the index knuckle (MCP).
    MousePad { anchor: Point },
    /// Index and pinky up, middle and ring down, thumb ignored.
    /// `spread` is the thumb-tip to index-tip distance in pixels.
    Zoom { spread: f32 },
    /// Thumb and index only.  `up` when the thumb tip is above the thumb MCP.
    Volume { up: bool },
    /// Index and middle only.  `y` is the index tip's image row.
    Scroll { y: i32 },
    /// Index, middle and ring only.
    DoubleClickHold,
    None,
}

impl Gesture {
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::MousePad { .. } => "mouse-pad",
            Gesture::Zoom { .. }     => "zoom",
            Gesture::Volume { .. }   => "volume",
            Gesture::Scroll { .. }   => "scroll",
            Gesture::DoubleClickHold => "double-click-hold",
            Gesture::None            => "none",
        }
    }
}

const ALL_UP:       [bool; 5] = [true,  true, true,  true,  true ];
const THUMB_INDEX:  [bool; 5] = [true,  true, false, false, false];
const TWO_FINGERS:  [bool; 5] = [false, true, true,  false, false];
const THREE_FINGERS: [bool; 5] = [false, true, true,  true,  false];

/// Classify one frame.
///
/// Rules are checked in priority order.  The patterns are pairwise disjoint,
/// so at most one category can match.
pub fn classify(states: &FingerStates, lm: &Landmarks) -> Gesture {
    if states.matches(ALL_UP) {
        return Gesture::MousePad { anchor: lm.get(Joint::IndexMcp) };
    }

    if states.is_extended(Finger::Index)
        && states.is_extended(Finger::Pinky)
        && !states.is_extended(Finger::Middle)
        && !states.is_extended(Finger::Ring)
    {
        let spread = distance(lm.get(Joint::ThumbTip), lm.get(Joint::IndexTip));
        return Gesture::Zoom { spread };
    }

    if states.matches(THUMB_INDEX) {
        let up = lm.get(Joint::ThumbTip).y < lm.get(Joint::ThumbMcp).y;
        return Gesture::Volume { up };
    }

    if states.matches(TWO_FINGERS) {
        return Gesture::Scroll { y: lm.get(Joint::IndexTip).y };
    }

    if states.matches(THREE_FINGERS) {
        return Gesture::DoubleClickHold;
    }

    Gesture::None
}

/// Compute finger states and classify in one go.
pub fn classify_landmarks(lm: &Landmarks, handedness: Handedness) -> Gesture {
    classify(&FingerStates::from_landmarks(lm, handedness), lm)
}
