//! # gesture_pad
//!
//! Face-gated hand-gesture desktop control.
//!
//! ```text
//!   FrameSource ──► IdentityGate ──► GestureEngine ──► ActionSink
//!   (script/sim)    (one-shot latch)  (classify+debounce) (log/enigo)
//! ```
//!
//! Each frame is read, gated, classified, debounced and dispatched before the
//! next one is read.  Until the designated person's face has been recognised
//! once, frames stop at the gate.
//!
//! ## Feature flags
//!
//! * `window`  : keyboard hand simulator in a minifb window ([`sim::SimSource`]).
//! * `os-input`: real mouse and keyboard events through enigo.

pub mod app;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod pose;
#[cfg(feature = "window")]
pub mod sim;
pub mod source;

pub use app::{run, Session, SessionStats};
pub use config::{AppConfig, AppConfigError, SinkKind};
pub use dispatch::{ActionSink, LogSink, RecordingSink, SinkError};
#[cfg(feature = "os-input")]
pub use dispatch::EnigoSink;
pub use pose::{HandModel, SimPose};
pub use source::{CameraFaces, FrameSource, PrecomputedFaces, ScriptSource, SensedFrame, SourceError};
