//! Synthetic hand poses.
//!
//! Builds a plausible 21-point hand for each gesture so the pipeline can be
//! driven without a camera: the keyboard simulator uses it live, and tests
//! use it to write replay scripts.

use hand_pose::{Handedness, Joint, Landmarks, Point, LANDMARK_COUNT};

/// Which gesture the synthetic hand is making.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimPose {
    MousePad,
    Zoom,
    Volume,
    Scroll,
    DoubleClick,
    Fist,
}

impl SimPose {
    /// Extended flags: thumb, index, middle, ring, pinky.
    pub fn fingers(self) -> [bool; 5] {
        match self {
            SimPose::MousePad    => [true,  true, true,  true,  true ],
            SimPose::Zoom        => [false, true, false, false, true ],
            SimPose::Volume      => [true,  true, false, false, false],
            SimPose::Scroll      => [false, true, true,  false, false],
            SimPose::DoubleClick => [false, true, true,  true,  false],
            SimPose::Fist        => [false; 5],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SimPose::MousePad    => "mouse pad",
            SimPose::Zoom        => "zoom",
            SimPose::Volume      => "volume",
            SimPose::Scroll      => "scroll",
            SimPose::DoubleClick => "double click",
            SimPose::Fist        => "fist",
        }
    }
}

/// Knuckle x-offsets from the wrist, index to pinky, for a right hand.
const FINGER_COLUMNS: [(Joint, i32); 4] = [
    (Joint::IndexMcp,  25),
    (Joint::MiddleMcp, 5),
    (Joint::RingMcp,   -15),
    (Joint::PinkyMcp,  -35),
];

/// Joint rows above the wrist: MCP, PIP, DIP, and the tip when extended / curled.
const MCP_DY:        i32 = -80;
const PIP_DY:        i32 = -110;
const DIP_DY:        i32 = -130;
const TIP_UP_DY:     i32 = -150;
const TIP_CURLED_DY: i32 = -95;

/// Parameters of the synthetic hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandModel {
    /// Wrist position in image pixels.
    pub origin:     Point,
    /// Thumb-tip to index-tip distance used by [`SimPose::Zoom`].
    pub spread:     i32,
    /// Thumb direction used by [`SimPose::Volume`].
    pub thumb_up:   bool,
    pub handedness: Handedness,
}

impl Default for HandModel {
    fn default() -> Self {
        HandModel {
            origin:     Point::new(320, 360),
            spread:     70,
            thumb_up:   true,
            handedness: Handedness::Right,
        }
    }
}

impl HandModel {
    pub fn synthesize(&self, pose: SimPose) -> Landmarks {
        let Point { x: ox, y: oy } = self.origin;
        let s = match self.handedness {
            Handedness::Right => 1,
            Handedness::Left  => -1,
        };
        let up = pose.fingers();
        let mut pts = [self.origin; LANDMARK_COUNT];

        pts[Joint::ThumbCmc.index()] = Point::new(ox + 30 * s, oy - 20);
        pts[Joint::ThumbMcp.index()] = Point::new(ox + 50 * s, oy - 40);
        pts[Joint::ThumbIp.index()]  = Point::new(ox + 65 * s, oy - 55);
        pts[Joint::ThumbTip.index()] = match (up[0], self.thumb_up) {
            (true, true)  => Point::new(ox + 85 * s, oy - 65),
            (true, false) => Point::new(ox + 85 * s, oy - 25),
            (false, _)    => Point::new(ox + 45 * s, oy - 50),
        };

        // MCP, PIP, DIP and tip are consecutive in model order.
        for (k, (mcp, dx)) in FINGER_COLUMNS.into_iter().enumerate() {
            let x = ox + dx * s;
            let tip_dy = if up[k + 1] { TIP_UP_DY } else { TIP_CURLED_DY };
            for (j, dy) in [MCP_DY, PIP_DY, DIP_DY, tip_dy].into_iter().enumerate() {
                pts[mcp.index() + j] = Point::new(x, oy + dy);
            }
        }

        let mut lm = Landmarks::new(pts);
        if pose == SimPose::Zoom {
            let tip = lm.get(Joint::IndexTip);
            lm.set(Joint::ThumbTip, Point::new(tip.x + self.spread * s, tip.y));
        }
        lm
    }
}

/// Pairs of joints joined by a bone, for drawing.
pub const HAND_BONES: [(Joint, Joint); 20] = [
    (Joint::Wrist,     Joint::ThumbCmc),
    (Joint::ThumbCmc,  Joint::ThumbMcp),
    (Joint::ThumbMcp,  Joint::ThumbIp),
    (Joint::ThumbIp,   Joint::ThumbTip),
    (Joint::Wrist,     Joint::IndexMcp),
    (Joint::IndexMcp,  Joint::IndexPip),
    (Joint::IndexPip,  Joint::IndexDip),
    (Joint::IndexDip,  Joint::IndexTip),
    (Joint::IndexMcp,  Joint::MiddleMcp),
    (Joint::MiddleMcp, Joint::MiddlePip),
    (Joint::MiddlePip, Joint::MiddleDip),
    (Joint::MiddleDip, Joint::MiddleTip),
    (Joint::MiddleMcp, Joint::RingMcp),
    (Joint::RingMcp,   Joint::RingPip),
    (Joint::RingPip,   Joint::RingDip),
    (Joint::RingDip,   Joint::RingTip),
    (Joint::RingMcp,   Joint::PinkyMcp),
    (Joint::PinkyMcp,  Joint::PinkyPip),
    (Joint::PinkyPip,  Joint::PinkyDip),
    (Joint::PinkyDip,  Joint::PinkyTip),
];

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_engine::{classify_landmarks, Gesture};
    use hand_pose::FingerStates;

    const POSES: [SimPose; 6] = [
        SimPose::MousePad, SimPose::Zoom, SimPose::Volume,
        SimPose::Scroll, SimPose::DoubleClick, SimPose::Fist,
    ];

    fn model(handedness: Handedness) -> HandModel {
        HandModel { handedness, ..HandModel::default() }
    }

    #[test]
    fn finger_states_match_pose_both_hands() {
        for h in [Handedness::Right, Handedness::Left] {
            for pose in POSES {
                let lm = model(h).synthesize(pose);
                let states = FingerStates::from_landmarks(&lm, h);
                if pose == SimPose::Zoom {
                    // Thumb position is repurposed for the spread; only the
                    // four fingers are fixed.
                    assert_eq!(&states.0[1..], &pose.fingers()[1..], "{:?}", h);
                } else {
                    assert_eq!(states.0, pose.fingers(), "{:?} {:?}", h, pose);
                }
            }
        }
    }

    #[test]
    fn poses_classify_to_their_category() {
        let m = HandModel::default();
        let name = |p| classify_landmarks(&m.synthesize(p), m.handedness).name();
        assert_eq!(name(SimPose::MousePad),    "mouse-pad");
        assert_eq!(name(SimPose::Zoom),        "zoom");
        assert_eq!(name(SimPose::Volume),      "volume");
        assert_eq!(name(SimPose::Scroll),      "scroll");
        assert_eq!(name(SimPose::DoubleClick), "double-click-hold");
        assert_eq!(name(SimPose::Fist),        "none");
    }

    #[test]
    fn zoom_spread_is_exact() {
        for spread in [20, 70, 120] {
            let m = HandModel { spread, ..HandModel::default() };
            match classify_landmarks(&m.synthesize(SimPose::Zoom), m.handedness) {
                Gesture::Zoom { spread: got } => assert!((got - spread as f32).abs() < 1e-3),
                other => panic!("{:?}", other),
            }
        }
    }

    #[test]
    fn thumb_direction_drives_volume() {
        for (thumb_up, want) in [(true, true), (false, false)] {
            let m = HandModel { thumb_up, ..HandModel::default() };
            assert_eq!(
                classify_landmarks(&m.synthesize(SimPose::Volume), m.handedness),
                Gesture::Volume { up: want }
            );
        }
    }

    #[test]
    fn scroll_row_follows_origin() {
        let m = HandModel { origin: Point::new(300, 200), ..HandModel::default() };
        assert_eq!(
            classify_landmarks(&m.synthesize(SimPose::Scroll), m.handedness),
            Gesture::Scroll { y: 50 }
        );
    }

    #[test]
    fn mouse_pad_anchor_is_index_knuckle() {
        let m = HandModel::default();
        assert_eq!(
            classify_landmarks(&m.synthesize(SimPose::MousePad), m.handedness),
            Gesture::MousePad { anchor: Point::new(345, 280) }
        );
    }
}
