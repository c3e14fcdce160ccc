//! Per-category debounce state machine.
//!
//! `GestureEngine` owns one independent tracker per action category:
//!
//! * a [`Cooldown`] each for zoom, volume, scroll and cursor movement,
//! * a [`HoldTimer`] for the double click,
//! * a [`PadSession`] for the mouse-pad anchor.
//!
//! Each call to [`GestureEngine::step`] is one camera frame.  The caller reads
//! the clock once and passes the same `now` to every category, so there is no
//! skew between checks within a frame.  Timestamps are monotonic
//! [`Duration`]s since the start of the session.

use std::time::Duration;

use hand_pose::{Landmarks, Point};
use tracing::{debug, trace};

use crate::action::Action;
use crate::classify::{classify_landmarks, Gesture};
use crate::config::{ConfigError, EngineConfig};

// ════════════════════════════════════════════════════════════════════════════
// Cooldown
// ════════════════════════════════════════════════════════════════════════════

/// Minimum spacing between fires of one action category.
///
/// Only an actual fire moves `last_fire`.  A frame that is permitted but
/// decides not to act (dead zone) leaves the timer untouched.
#[derive(Clone, Debug)]
pub struct Cooldown {
    period:    Duration,
    last_fire: Option<Duration>,
}

impl Cooldown {
    pub fn new(period: Duration) -> Self {
        Cooldown { period, last_fire: None }
    }

    /// True if never fired, or strictly more than `period` has elapsed.
    pub fn ready(&self, now: Duration) -> bool {
        match self.last_fire {
            None       => true,
            Some(last) => now.saturating_sub(last) > self.period,
        }
    }

    pub fn fire(&mut self, now: Duration) { self.last_fire = Some(now); }

    pub fn last_fire(&self) -> Option<Duration> { self.last_fire }

    pub fn reset(&mut self) { self.last_fire = None; }
}

// ════════════════════════════════════════════════════════════════════════════
// HoldTimer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum HoldPhase {
    Idle,
    Holding { since: Duration },
    /// Fired during this hold; waits for release before re-arming.
    Spent,
}

/// Hold-to-confirm gate: fires once after the pose has been held for `hold`.
#[derive(Clone, Debug)]
pub struct HoldTimer {
    hold:  Duration,
    phase: HoldPhase,
}

impl HoldTimer {
    pub fn new(hold: Duration) -> Self {
        HoldTimer { hold, phase: HoldPhase::Idle }
    }

    /// Feed one frame.  Returns true on the single frame the hold completes.
    pub fn update(&mut self, now: Duration, matching: bool) -> bool {
        if !matching {
            self.phase = HoldPhase::Idle;
            return false;
        }
        match self.phase {
            HoldPhase::Idle => {
                self.phase = HoldPhase::Holding { since: now };
                false
            }
            HoldPhase::Holding { since } if now.saturating_sub(since) >= self.hold => {
                self.phase = HoldPhase::Spent;
                true
            }
            HoldPhase::Holding { .. } | HoldPhase::Spent => false,
        }
    }

    /// When the current hold started, if one is in progress.
    pub fn started(&self) -> Option<Duration> {
        match self.phase {
            HoldPhase::Holding { since } => Some(since),
            _                            => None,
        }
    }

    pub fn clear(&mut self) { self.phase = HoldPhase::Idle; }
}

// ════════════════════════════════════════════════════════════════════════════
// PadSession
// ════════════════════════════════════════════════════════════════════════════

/// Mouse-pad anchor.  Active while the open-palm pose is held.
#[derive(Clone, Debug, Default)]
pub struct PadSession {
    reference: Option<Point>,
}

impl PadSession {
    /// Record `current` as the new reference.
    ///
    /// Returns `None` on the entry frame, otherwise the raw displacement from
    /// the previous frame's reference.
    pub fn track(&mut self, current: Point) -> Option<(i64, i64)> {
        let delta = self
            .reference
            .map(|r| (current.x as i64 - r.x as i64, current.y as i64 - r.y as i64));
        self.reference = Some(current);
        delta
    }

    pub fn is_active(&self) -> bool { self.reference.is_some() }

    pub fn reference(&self) -> Option<Point> { self.reference }

    pub fn clear(&mut self) { self.reference = None; }
}

fn saturate(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

// ════════════════════════════════════════════════════════════════════════════
// GestureEngine
// ════════════════════════════════════════════════════════════════════════════

/// Frame-by-frame gesture → action state machine.
#[derive(Clone, Debug)]
pub struct GestureEngine {
    config: EngineConfig,

    zoom:   Cooldown,
    volume: Cooldown,
    scroll: Cooldown,
    mouse:  Cooldown,

    double_click: HoldTimer,
    pad:          PadSession,

    last_gesture: Gesture,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        GestureEngine {
            zoom:         Cooldown::new(config.zoom_cooldown()),
            volume:       Cooldown::new(config.volume_cooldown()),
            scroll:       Cooldown::new(config.scroll_cooldown()),
            mouse:        Cooldown::new(config.mouse_cooldown()),
            double_click: HoldTimer::new(config.double_click_hold()),
            pad:          PadSession::default(),
            last_gesture: Gesture::None,
            config,
        }
    }

    /// Process one frame.  `hand` is `None` when no hand was detected.
    pub fn step(&mut self, now: Duration, hand: Option<&Landmarks>) -> Vec<Action> {
        let gesture = match hand {
            Some(lm) => classify_landmarks(lm, self.config.handedness),
            None     => Gesture::None,
        };
        self.apply(now, gesture)
    }

    /// Process one already-classified frame.
    pub fn apply(&mut self, now: Duration, gesture: Gesture) -> Vec<Action> {
        trace!(gesture = gesture.name(), ?now, "frame");
        let mut out = Vec::new();

        match gesture {
            Gesture::MousePad { anchor } => self.pad_move(now, anchor, &mut out),
            _ => {
                if self.pad.is_active() {
                    debug!("mouse-pad released");
                }
                self.pad.clear();
            }
        }

        match gesture {
            Gesture::Zoom { spread } => self.zoom(now, spread, &mut out),
            Gesture::Volume { up }   => self.volume(now, up, &mut out),
            Gesture::Scroll { y }    => self.scroll(now, y, &mut out),
            _ => {}
        }

        let holding = gesture == Gesture::DoubleClickHold;
        if self.double_click.update(now, holding) {
            out.push(Action::DoubleClick);
        }

        self.last_gesture = gesture;
        out
    }

    fn pad_move(&mut self, now: Duration, anchor: Point, out: &mut Vec<Action>) {
        match self.pad.track(anchor) {
            None => {
                // Entry frame anchors only; it also starts the move cooldown.
                self.mouse.fire(now);
                debug!(%anchor, "mouse-pad anchored");
            }
            Some((dx, dy)) => {
                if self.mouse.ready(now) {
                    let s = self.config.mouse_sensitivity as i64;
                    // x is negated: the camera image is mirrored.
                    out.push(Action::MoveRelative {
                        dx: saturate(dx.saturating_neg().saturating_mul(s)),
                        dy: saturate(dy.saturating_mul(s)),
                    });
                    self.mouse.fire(now);
                }
            }
        }
    }

    fn zoom(&mut self, now: Duration, spread: f32, out: &mut Vec<Action>) {
        if !self.zoom.ready(now) {
            return;
        }
        let action = if spread < self.config.zoom_out_below {
            Action::ZoomOut
        } else if spread > self.config.zoom_in_above {
            Action::ZoomIn
        } else {
            trace!(spread, "zoom dead zone");
            return;
        };
        self.zoom.fire(now);
        out.push(action);
    }

    fn volume(&mut self, now: Duration, up: bool, out: &mut Vec<Action>) {
        if !self.volume.ready(now) {
            return;
        }
        self.volume.fire(now);
        out.push(if up { Action::VolumeUp } else { Action::VolumeDown });
    }

    fn scroll(&mut self, now: Duration, y: i32, out: &mut Vec<Action>) {
        if !self.scroll.ready(now) {
            return;
        }
        let amount = self.config.scroll_amount;
        let action = if y <= self.config.scroll_up_max_y {
            Action::ScrollUp { amount }
        } else if y >= self.config.scroll_down_min_y {
            Action::ScrollDown { amount }
        } else {
            return;
        };
        self.scroll.fire(now);
        out.push(action);
    }

    /// Drop every transient tracker and cooldown.
    pub fn reset(&mut self) {
        *self = Self::build(self.config.clone());
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self)        -> &EngineConfig { &self.config }
    pub fn last_gesture(&self)  -> Gesture       { self.last_gesture }
    pub fn pad(&self)           -> &PadSession   { &self.pad }
    pub fn hold(&self)          -> &HoldTimer    { &self.double_click }
    pub fn zoom_cooldown(&self)   -> &Cooldown   { &self.zoom }
    pub fn volume_cooldown(&self) -> &Cooldown   { &self.volume }
    pub fn scroll_cooldown(&self) -> &Cooldown   { &self.scroll }
    pub fn mouse_cooldown(&self)  -> &Cooldown   { &self.mouse }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
