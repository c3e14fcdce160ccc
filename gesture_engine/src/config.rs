//! Engine tuning: cooldowns, thresholds, sensitivity.

use std::time::Duration;

use hand_pose::Handedness;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    BadDuration { field: &'static str, value: f64 },
    #[error("zoom_out_below ({near}) must be smaller than zoom_in_above ({far})")]
    ZoomBand { near: f32, far: f32 },
    #[error("scroll_up_max_y ({up}) must be smaller than scroll_down_min_y ({down})")]
    ScrollBand { up: i32, down: i32 },
    #[error("mouse_sensitivity must be positive (got {0})")]
    Sensitivity(i32),
    #[error("scroll_amount must be positive (got {0})")]
    ScrollAmount(i32),
}

/// Every constant the state machine uses.  Durations are in seconds.
///
/// Missing fields in a config file fall back to [`EngineConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zoom_cooldown_secs:     f64,
    pub volume_cooldown_secs:   f64,
    pub scroll_cooldown_secs:   f64,
    pub mouse_cooldown_secs:    f64,
    /// How long the three-finger pose must be held before a double click.
    pub double_click_hold_secs: f64,

    /// Thumb–index spread (px) below which zoom-out fires.
    pub zoom_out_below:    f32,
    /// Thumb–index spread (px) above which zoom-in fires.
    pub zoom_in_above:     f32,
    /// Index tip rows at or above this scroll up.
    pub scroll_up_max_y:   i32,
    /// Index tip rows at or below this scroll down.
    pub scroll_down_min_y: i32,
    pub scroll_amount:     i32,

    /// Cursor pixels per pixel of index-knuckle motion.
    pub mouse_sensitivity: i32,
    pub handedness:        Handedness,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            zoom_cooldown_secs:     0.5,
            volume_cooldown_secs:   0.4,
            scroll_cooldown_secs:   0.1,
            mouse_cooldown_secs:    0.01,
            double_click_hold_secs: 0.6,
            zoom_out_below:    50.0,
            zoom_in_above:     90.0,
            scroll_up_max_y:   80,
            scroll_down_min_y: 280,
            scroll_amount:     50,
            mouse_sensitivity: 3,
            handedness:        Handedness::Right,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("zoom_cooldown_secs",     self.zoom_cooldown_secs),
            ("volume_cooldown_secs",   self.volume_cooldown_secs),
            ("scroll_cooldown_secs",   self.scroll_cooldown_secs),
            ("mouse_cooldown_secs",    self.mouse_cooldown_secs),
            ("double_click_hold_secs", self.double_click_hold_secs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::BadDuration { field, value });
            }
        }
        if !(self.zoom_out_below < self.zoom_in_above) {
            return Err(ConfigError::ZoomBand { near: self.zoom_out_below, far: self.zoom_in_above });
        }
        if self.scroll_up_max_y >= self.scroll_down_min_y {
            return Err(ConfigError::ScrollBand { up: self.scroll_up_max_y, down: self.scroll_down_min_y });
        }
        if self.mouse_sensitivity <= 0 {
            return Err(ConfigError::Sensitivity(self.mouse_sensitivity));
        }
        if self.scroll_amount <= 0 {
            return Err(ConfigError::ScrollAmount(self.scroll_amount));
        }
        Ok(())
    }

    pub fn zoom_cooldown(&self)   -> Duration { secs(self.zoom_cooldown_secs) }
    pub fn volume_cooldown(&self) -> Duration { secs(self.volume_cooldown_secs) }
    pub fn scroll_cooldown(&self) -> Duration { secs(self.scroll_cooldown_secs) }
    pub fn mouse_cooldown(&self)  -> Duration { secs(self.mouse_cooldown_secs) }
    pub fn double_click_hold(&self) -> Duration { secs(self.double_click_hold_secs) }
}

// Rounded to the nanosecond so 0.6 is exactly 600 ms.
fn secs(s: f64) -> Duration {
    if !s.is_finite() || s <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((s * 1e9).round() as u64)
}
