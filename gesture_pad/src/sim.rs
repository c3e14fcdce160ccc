//! Keyboard hand simulator (feature = "window").
//!
//! A small minifb window draws the synthetic hand and turns key presses into
//! frames, so the whole pipeline can be exercised without a camera.
//!
//! | Key        | Effect                                   |
//! |------------|------------------------------------------|
//! | 1 – 5      | mouse pad, zoom, volume, scroll, click   |
//! | 0          | fist (no gesture)                        |
//! | H          | hide / show the hand                     |
//! | Arrows     | move the hand                            |
//! | Z / X      | narrow / widen the zoom spread           |
//! | U / J      | thumb up / down                          |
//! | F (held)   | show the enrolled face to the camera     |
//! | Esc / Q    | quit                                     |

use std::time::{Duration, Instant};

use face_gate::Embedding;
use hand_pose::{Handedness, Landmarks, Point};
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use crate::pose::{HandModel, SimPose, HAND_BONES};
use crate::source::{FrameSource, SensedFrame, SourceError};

pub const WIN_W: usize = 640;
pub const WIN_H: usize = 480;

const BG_COLOR:    u32 = 0xFF1A1A2E;
const BONE_COLOR:  u32 = 0xFF4FC3F7;
const JOINT_COLOR: u32 = 0xFFFFD700;
const BAND_COLOR:  u32 = 0xFF2A2A44;
const FACE_COLOR:  u32 = 0xFF66BB6A;

const MOVE_STEP:   i32 = 4;
const SPREAD_STEP: i32 = 2;

// ════════════════════════════════════════════════════════════════════════════
// SimSource
// ════════════════════════════════════════════════════════════════════════════

pub struct SimSource {
    window:       Window,
    buf:          Vec<u32>,
    model:        HandModel,
    pose:         SimPose,
    hand_visible: bool,
    /// Embedding shown while F is held.
    face:         Option<Embedding>,
    /// Image rows of the scroll-up / scroll-down limits, drawn as guides.
    scroll_band:  (i32, i32),
    started:      Instant,
}

impl SimSource {
    pub fn new(
        handedness:  Handedness,
        face:        Option<Embedding>,
        scroll_band: (i32, i32),
    ) -> Result<Self, SourceError> {
        let mut window = Window::new(
            "gesture_pad simulator",
            WIN_W, WIN_H,
            WindowOptions { resize: false, ..WindowOptions::default() },
        ).map_err(|e| SourceError::Window(e.to_string()))?;

        window.limit_update_rate(Some(Duration::from_millis(16)));

        Ok(SimSource {
            window,
            buf: vec![BG_COLOR; WIN_W * WIN_H],
            model: HandModel { handedness, ..HandModel::default() },
            pose: SimPose::Fist,
            hand_visible: true,
            face,
            scroll_band,
            started: Instant::now(),
        })
    }

    /// Apply this frame's key presses.  Returns false on quit.
    fn poll_keys(&mut self) -> bool {
        if !self.window.is_open() {
            return false;
        }
        let one_shot = |w: &Window, k: Key| w.is_key_pressed(k, KeyRepeat::No);

        if one_shot(&self.window, Key::Escape) || one_shot(&self.window, Key::Q) {
            return false;
        }

        let poses = [
            (Key::Key1, SimPose::MousePad),
            (Key::Key2, SimPose::Zoom),
            (Key::Key3, SimPose::Volume),
            (Key::Key4, SimPose::Scroll),
            (Key::Key5, SimPose::DoubleClick),
            (Key::Key0, SimPose::Fist),
        ];
        for (key, pose) in poses {
            if one_shot(&self.window, key) {
                self.pose = pose;
            }
        }
        if one_shot(&self.window, Key::H) { self.hand_visible = !self.hand_visible; }
        if one_shot(&self.window, Key::U) { self.model.thumb_up = true; }
        if one_shot(&self.window, Key::J) { self.model.thumb_up = false; }

        let held = |k: Key| self.window.is_key_down(k);
        let (mut dx, mut dy, mut ds) = (0, 0, 0);
        if held(Key::Left)  { dx -= MOVE_STEP; }
        if held(Key::Right) { dx += MOVE_STEP; }
        if held(Key::Up)    { dy -= MOVE_STEP; }
        if held(Key::Down)  { dy += MOVE_STEP; }
        if held(Key::Z)     { ds -= SPREAD_STEP; }
        if held(Key::X)     { ds += SPREAD_STEP; }

        let o = self.model.origin;
        self.model.origin = Point::new(
            (o.x + dx).clamp(0, WIN_W as i32 - 1),
            (o.y + dy).clamp(0, WIN_H as i32 - 1),
        );
        self.model.spread = (self.model.spread + ds).clamp(0, 300);
        true
    }

    fn render(&mut self, hand: Option<&Landmarks>, face_shown: bool) -> Result<(), SourceError> {
        self.buf.fill(BG_COLOR);

        let (up, down) = self.scroll_band;
        for row in [up, down] {
            if (0..WIN_H as i32).contains(&row) {
                let start = row as usize * WIN_W;
                self.buf[start..start + WIN_W].fill(BAND_COLOR);
            }
        }

        if face_shown {
            self.fill_rect(WIN_W - 60, 12, 48, 60, FACE_COLOR);
        }

        if let Some(lm) = hand {
            for (a, b) in HAND_BONES {
                self.line(lm.get(a), lm.get(b), BONE_COLOR);
            }
            for p in lm.points() {
                self.dot(*p, JOINT_COLOR);
            }
        }

        let title = format!(
            "gesture_pad simulator | {} | spread {} | thumb {}{}",
            self.pose.label(),
            self.model.spread,
            if self.model.thumb_up { "up" } else { "down" },
            if self.hand_visible { "" } else { " | hand hidden" },
        );
        self.window.set_title(&title);
        self.window
            .update_with_buffer(&self.buf, WIN_W, WIN_H)
            .map_err(|e| SourceError::Window(e.to_string()))
    }

    // ── pixel helpers ─────────────────────────────────────────────────────

    fn put(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < WIN_W && (y as usize) < WIN_H {
            self.buf[y as usize * WIN_W + x as usize] = color;
        }
    }

    fn dot(&mut self, p: Point, color: u32) {
        for dy in -2..=2 {
            for dx in -2..=2 {
                self.put(p.x + dx, p.y + dy, color);
            }
        }
    }

    fn line(&mut self, a: Point, b: Point, color: u32) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).max(1);
        for i in 0..=steps {
            let x = a.x + (b.x - a.x) * i / steps;
            let y = a.y + (b.y - a.y) * i / steps;
            self.put(x, y, color);
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(WIN_H) {
            let end = (x + w).min(WIN_W);
            self.buf[row * WIN_W + x..row * WIN_W + end].fill(color);
        }
    }
}

impl FrameSource for SimSource {
    fn next_frame(&mut self) -> Result<Option<SensedFrame>, SourceError> {
        if !self.poll_keys() {
            return Ok(None);
        }
        let at = self.started.elapsed();

        let hand = self.hand_visible.then(|| self.model.synthesize(self.pose));
        let face_shown = self.window.is_key_down(Key::F);
        let faces = match (&self.face, face_shown) {
            (Some(e), true) => vec![e.clone()],
            _               => Vec::new(),
        };

        self.render(hand.as_ref(), face_shown)?;
        Ok(Some(SensedFrame { at, hand, faces, image: None }))
    }
}
