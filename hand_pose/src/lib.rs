//! # hand_pose
//!
//! Per-frame hand geometry for a 21-point hand landmark model.
//!
//! A [`Landmarks`] frame holds 21 integer pixel coordinates addressed by
//! [`Joint`].  From it we derive a [`FingerStates`] vector (which of the five
//! fingers are extended) plus the two pieces of pixel geometry the gesture
//! rules need: [`distance`] and [`midpoint`].
//!
//! ```text
//!            8   12  16  20        tips
//!            7   11  15  19        DIP
//!        4   6   10  14  18        PIP
//!      3     5   9   13  17        MCP
//!    2
//!      1
//!            0                     wrist
//! ```
//!
//! Image coordinates: `x` grows to the right, `y` grows **down**, so a
//! fingertip "above" its knuckle has the smaller `y`.
//!
//! ## Quick start
//!
//! ```rust
//! use hand_pose::{FingerStates, Handedness, Landmarks, Point};
//!
//! let lm = Landmarks::from_slice(&[Point::new(0, 0); 21]).unwrap();
//! let states = FingerStates::from_landmarks(&lm, Handedness::Right);
//! assert_eq!(states.count(), 0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of landmarks in one hand frame.
pub const LANDMARK_COUNT: usize = 21;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoseError {
    /// A landmark frame must carry exactly [`LANDMARK_COUNT`] points.
    #[error("expected 21 hand landmarks, got {0}")]
    WrongCount(usize),
}

// ════════════════════════════════════════════════════════════════════════════
// Point
// ════════════════════════════════════════════════════════════════════════════

/// An integer pixel coordinate.  Serialized as a two-element array `[x, y]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Point { x, y } }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self { Point { x, y } }
}

impl From<Point> for (i32, i32) {
    fn from(p: Point) -> Self { (p.x, p.y) }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Euclidean distance between two pixel coordinates.  Never negative.
pub fn distance(a: Point, b: Point) -> f32 {
    // i64 so that far-apart points don't overflow the subtraction.
    let dx = (a.x as i64 - b.x as i64) as f64;
    let dy = (a.y as i64 - b.y as i64) as f64;
    dx.hypot(dy) as f32
}

/// Elementwise mean of two points, truncated toward zero.
pub fn midpoint(a: Point, b: Point) -> Point {
    // i64 so that sums near i32::MAX don't overflow before halving.
    let x = (a.x as i64 + b.x as i64) / 2;
    let y = (a.y as i64 + b.y as i64) / 2;
    Point::new(x as i32, y as i32)
}

// ════════════════════════════════════════════════════════════════════════════
// Joint: anatomical landmark ids
// ════════════════════════════════════════════════════════════════════════════

/// The 21 hand landmarks, in model order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Joint {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl Joint {
    pub fn index(self) -> usize { self as usize }
}

// ════════════════════════════════════════════════════════════════════════════
// Landmarks
// ════════════════════════════════════════════════════════════════════════════

/// One hand's landmarks for a single frame.
///
/// Deserializes from a JSON array of 21 `[x, y]` pairs; any other length is
/// rejected with [`PoseError::WrongCount`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point>", into = "Vec<Point>")]
pub struct Landmarks {
    points: [Point; LANDMARK_COUNT],
}

impl Landmarks {
    pub fn new(points: [Point; LANDMARK_COUNT]) -> Self { Landmarks { points } }

    pub fn from_slice(points: &[Point]) -> Result<Self, PoseError> {
        let points: [Point; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| PoseError::WrongCount(points.len()))?;
        Ok(Landmarks { points })
    }

    pub fn get(&self, joint: Joint) -> Point { self.points[joint.index()] }

    pub fn set(&mut self, joint: Joint, p: Point) { self.points[joint.index()] = p; }

    pub fn points(&self) -> &[Point; LANDMARK_COUNT] { &self.points }
}

impl TryFrom<Vec<Point>> for Landmarks {
    type Error = PoseError;
    fn try_from(v: Vec<Point>) -> Result<Self, Self::Error> { Landmarks::from_slice(&v) }
}

impl From<Landmarks> for Vec<Point> {
    fn from(lm: Landmarks) -> Self { lm.points.to_vec() }
}

// ════════════════════════════════════════════════════════════════════════════
// Finger / Handedness
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky,
    ];

    pub fn tip(self) -> Joint {
        match self {
            Finger::Thumb  => Joint::ThumbTip,
            Finger::Index  => Joint::IndexTip,
            Finger::Middle => Joint::MiddleTip,
            Finger::Ring   => Joint::RingTip,
            Finger::Pinky  => Joint::PinkyTip,
        }
    }

    /// The joint the tip is compared against: the thumb's adjacent IP joint,
    /// or the PIP joint two below the tip for the other fingers.
    pub fn pivot(self) -> Joint {
        match self {
            Finger::Thumb  => Joint::ThumbIp,
            Finger::Index  => Joint::IndexPip,
            Finger::Middle => Joint::MiddlePip,
            Finger::Ring   => Joint::RingPip,
            Finger::Pinky  => Joint::PinkyPip,
        }
    }
}

/// Which way an extended thumb points in the image.
///
/// The thumb folds sideways, so its extension test is horizontal and depends
/// on which hand faces the camera.  `Right` treats the thumb as extended when
/// its tip lies to the right of the IP joint; `Left` mirrors that.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

/// Whether `finger` is extended in this frame.
pub fn finger_extended(lm: &Landmarks, finger: Finger, handedness: Handedness) -> bool {
    let tip   = lm.get(finger.tip());
    let pivot = lm.get(finger.pivot());
    match (finger, handedness) {
        (Finger::Thumb, Handedness::Right) => tip.x > pivot.x,
        (Finger::Thumb, Handedness::Left)  => tip.x < pivot.x,
        _                                  => tip.y < pivot.y,
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FingerStates
// ════════════════════════════════════════════════════════════════════════════

/// Extended / not-extended for thumb, index, middle, ring, pinky (in that order).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FingerStates(pub [bool; 5]);

impl FingerStates {
    pub fn from_landmarks(lm: &Landmarks, handedness: Handedness) -> Self {
        FingerStates(Finger::ALL.map(|f| finger_extended(lm, f, handedness)))
    }

    pub fn is_extended(&self, finger: Finger) -> bool { self.0[finger as usize] }

    /// Exact match against a full five-finger pattern.
    pub fn matches(&self, pattern: [bool; 5]) -> bool { self.0 == pattern }

    pub fn count(&self) -> usize { self.0.iter().filter(|&&b| b).count() }
}

impl fmt::Display for FingerStates {
    /// `T I M R P` with `-` for curled fingers, e.g. `-IM--`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (ext, c) in self.0.iter().zip(['T', 'I', 'M', 'R', 'P']) {
            write!(f, "{}", if *ext { c } else { '-' })?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
