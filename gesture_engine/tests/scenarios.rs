//! Frame-sequence scenarios driven through landmarks, end to end.

use std::time::Duration;

use gesture_engine::{Action, EngineConfig, Gesture, GestureEngine};
use hand_pose::{Joint, Landmarks, Point, LANDMARK_COUNT};

fn secs(s: f64) -> Duration { Duration::from_secs_f64(s) }
fn ms(n: u64) -> Duration { Duration::from_millis(n) }

/// A hand with the wrist at `origin`; `up` lists which fingers
/// (thumb, index, middle, ring, pinky) are extended.
fn hand(origin: Point, up: [bool; 5]) -> Landmarks {
    let Point { x: ox, y: oy } = origin;
    let mut lm = Landmarks::new([origin; LANDMARK_COUNT]);

    lm.set(Joint::ThumbCmc, Point::new(ox + 30, oy - 20));
    lm.set(Joint::ThumbMcp, Point::new(ox + 50, oy - 40));
    lm.set(Joint::ThumbIp,  Point::new(ox + 65, oy - 55));
    let thumb_x = if up[0] { ox + 85 } else { ox + 45 };
    lm.set(Joint::ThumbTip, Point::new(thumb_x, oy - 65));

    let columns = [
        (Joint::IndexMcp,  ox + 25, up[1]),
        (Joint::MiddleMcp, ox + 5,  up[2]),
        (Joint::RingMcp,   ox - 15, up[3]),
        (Joint::PinkyMcp,  ox - 35, up[4]),
    ];
    for (mcp, x, extended) in columns {
        let base = mcp as usize;
        let pts = lm_points(x, oy, extended);
        for (k, p) in pts.into_iter().enumerate() {
            set_index(&mut lm, base + k, p);
        }
    }
    lm
}

fn lm_points(x: i32, oy: i32, extended: bool) -> [Point; 4] {
    let tip = if extended { oy - 150 } else { oy - 95 };
    [
        Point::new(x, oy - 80),
        Point::new(x, oy - 110),
        Point::new(x, oy - 130),
        Point::new(x, tip),
    ]
}

fn set_index(lm: &mut Landmarks, i: usize, p: Point) {
    let mut pts = *lm.points();
    pts[i] = p;
    *lm = Landmarks::new(pts);
}

const OPEN:  [bool; 5] = [true;  5];
const THREE: [bool; 5] = [false, true, true, true, false];
const TWO:   [bool; 5] = [false, true, true, false, false];

fn moves(actions: &[Action]) -> usize {
    actions.iter().filter(|a| matches!(a, Action::MoveRelative { .. })).count()
}

#[test]
fn synthetic_hand_classifies() {
    let mut e = GestureEngine::default();
    e.step(ms(0), Some(&hand(Point::new(200, 300), THREE)));
    assert_eq!(e.last_gesture(), Gesture::DoubleClickHold);
    e.step(ms(1), Some(&hand(Point::new(200, 300), TWO)));
    assert_eq!(e.last_gesture(), Gesture::Scroll { y: 150 });
}

// ── Scenario A: mouse-pad spacing against the 10 ms cooldown ──────────────

#[test]
fn mouse_pad_moves_only_after_cooldown() {
    let mut e = GestureEngine::default();
    let p0 = Point::new(200, 300);
    let p1 = Point::new(204, 300);
    let p2 = Point::new(210, 296);

    let a0 = e.step(secs(0.0),   Some(&hand(p0, OPEN)));
    let a1 = e.step(secs(0.005), Some(&hand(p1, OPEN)));
    let a2 = e.step(secs(0.015), Some(&hand(p2, OPEN)));

    assert!(a0.is_empty(), "entry frame anchors only");
    assert!(a1.is_empty(), "5 ms after anchoring is inside the cooldown");
    // Relative to frame 2's knuckle, not frame 1's.
    assert_eq!(a2, vec![Action::MoveRelative { dx: -(6 * 3), dy: -4 * 3 }]);
}

#[test]
fn mouse_pad_two_moves_when_spaced_out() {
    let mut e = GestureEngine::default();
    let mut total = 0;
    for (i, t) in [0.0, 0.02, 0.04].into_iter().enumerate() {
        total += moves(&e.step(secs(t), Some(&hand(Point::new(200 + i as i32, 300), OPEN))));
    }
    assert_eq!(total, 2);
}

#[test]
fn mouse_pad_velocity_not_cumulative() {
    let mut e = GestureEngine::default();
    e.step(ms(0),  Some(&hand(Point::new(100, 300), OPEN)));
    e.step(ms(20), Some(&hand(Point::new(110, 300), OPEN)));
    let out = e.step(ms(40), Some(&hand(Point::new(112, 300), OPEN)));
    // (P2 - P1) * 3, not (P2 - P0) * 3.
    assert_eq!(out, vec![Action::MoveRelative { dx: -6, dy: 0 }]);
}

#[test]
fn mouse_pad_reanchors_after_gap() {
    let mut e = GestureEngine::default();
    e.step(ms(0),  Some(&hand(Point::new(100, 300), OPEN)));
    e.step(ms(20), Some(&hand(Point::new(100, 300), THREE)));
    e.step(ms(40), None);
    let out = e.step(ms(60), Some(&hand(Point::new(400, 400), OPEN)));
    assert!(out.is_empty(), "re-entry must not jump the cursor");
    assert_eq!(e.pad().reference(), Some(Point::new(425, 320)));
}

// ── Scenario B: zoom distances with cooldown satisfied ────────────────────

#[test]
fn zoom_distance_sequence() {
    let mut e = GestureEngine::default();
    let got: Vec<Vec<Action>> = [40.0, 100.0, 70.0, 45.0]
        .into_iter()
        .enumerate()
        .map(|(i, spread)| e.apply(ms(600 * i as u64), Gesture::Zoom { spread }))
        .collect();
    assert_eq!(got, vec![
        vec![Action::ZoomOut],
        vec![Action::ZoomIn],
        vec![],
        vec![Action::ZoomOut],
    ]);
}

#[test]
fn zoom_dead_zone_never_fires_or_resets() {
    let mut e = GestureEngine::default();
    for i in 0..200u64 {
        let spread = 50.0 + (i % 41) as f32;
        assert!(e.apply(ms(i * 7), Gesture::Zoom { spread }).is_empty());
    }
    assert_eq!(e.zoom_cooldown().last_fire(), None);
}

// ── Cooldown invariant ─────────────────────────────────────────────────────

#[test]
fn consecutive_fires_separated_by_more_than_cooldown() {
    let cfg = EngineConfig::default();
    let mut e = GestureEngine::new(cfg.clone()).unwrap();
    let mut fires = Vec::new();
    for i in 0..500u64 {
        let now = ms(i * 3);
        let up = i % 2 == 0;
        if !e.apply(now, Gesture::Volume { up }).is_empty() {
            fires.push(now);
        }
    }
    assert!(fires.len() > 2);
    for pair in fires.windows(2) {
        assert!(pair[1] - pair[0] > cfg.volume_cooldown());
    }
}

#[test]
fn dead_zone_frames_inside_cooldown_keep_last_fire() {
    let mut e = GestureEngine::default();
    e.apply(ms(0), Gesture::Scroll { y: 20 });
    for t in [20, 40, 60, 80, 99] {
        e.apply(ms(t), Gesture::Scroll { y: 180 });
    }
    assert_eq!(e.scroll_cooldown().last_fire(), Some(ms(0)));
}

// ── Double click hold ──────────────────────────────────────────────────────

fn double_clicks(actions: &[Vec<Action>]) -> usize {
    actions.iter().flatten().filter(|a| **a == Action::DoubleClick).count()
}

#[test]
fn long_hold_fires_exactly_once() {
    let mut e = GestureEngine::default();
    let out: Vec<_> = (0..=100u64)
        .map(|i| e.step(ms(i * 30), Some(&hand(Point::new(200, 300), THREE))))
        .collect();
    assert_eq!(double_clicks(&out), 1);
}

#[test]
fn release_and_reform_fires_again() {
    let mut e = GestureEngine::default();
    let mut out = Vec::new();
    let three = hand(Point::new(200, 300), THREE);
    let two = hand(Point::new(200, 300), TWO);
    let mut t = 0;
    for release in [None, Some(&two)] {
        for _ in 0..25 {
            out.push(e.step(ms(t), Some(&three)));
            t += 30;
        }
        out.push(e.step(ms(t), release));
        t += 30;
    }
    assert_eq!(double_clicks(&out), 2);
}

#[test]
fn short_hold_never_fires() {
    let mut e = GestureEngine::default();
    let mut out = Vec::new();
    for i in 0..20u64 {
        out.push(e.step(ms(i * 30), Some(&hand(Point::new(200, 300), THREE))));
    }
    out.push(e.step(ms(20 * 30), None));
    out.push(e.step(ms(21 * 30), Some(&hand(Point::new(200, 300), THREE))));
    assert_eq!(double_clicks(&out), 0);
}
