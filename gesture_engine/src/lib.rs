//! # gesture_engine
//!
//! Turns a stream of hand-landmark frames into debounced input actions.
//!
//! * [`classify`] maps a finger-extension pattern (plus a little landmark
//!   geometry) to one [`Gesture`].
//! * [`GestureEngine`] owns one timer per action category and decides, frame
//!   by frame, which [`Action`]s actually fire.
//!
//! ## Gesture → Action mapping
//!
//! | Fingers up | Gesture | Action |
//! |---|---|---|
//! | all five | MousePad | relative cursor move from index-knuckle motion |
//! | index + pinky (thumb any) | Zoom | thumb–index spread < 50 → zoom out, > 90 → zoom in |
//! | thumb + index | Volume | thumb tip above its knuckle → up, else down |
//! | index + middle | Scroll | index tip y ≤ 80 → up, ≥ 280 → down |
//! | index + middle + ring | DoubleClickHold | held 0.6 s → one double click |
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use gesture_engine::{Action, Gesture, GestureEngine};
//!
//! let mut engine = GestureEngine::default();
//! let out = engine.apply(Duration::ZERO, Gesture::Zoom { spread: 30.0 });
//! assert_eq!(out, vec![Action::ZoomOut]);
//! ```

pub mod action;
pub mod classify;
pub mod config;
pub mod engine;

pub use action::Action;
pub use classify::{classify, classify_landmarks, Gesture};
pub use config::{ConfigError, EngineConfig};
pub use engine::{Cooldown, GestureEngine, HoldTimer, PadSession};
