//! Action dispatch: turns engine [`Action`]s into desktop input.
//!
//! Dispatch is fire-and-forget.  A failing backend is reported to the caller
//! as a [`SinkError`], which the session logs and otherwise ignores.

use gesture_engine::Action;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("{action} failed: {reason}")]
    Failed { action: &'static str, reason: String },
}

/// Something that performs desktop actions.
pub trait ActionSink {
    fn perform(&mut self, action: &Action) -> Result<(), SinkError>;
}

impl<S: ActionSink + ?Sized> ActionSink for Box<S> {
    fn perform(&mut self, action: &Action) -> Result<(), SinkError> {
        (**self).perform(action)
    }
}

// ── logging sink (always available) ───────────────────────────────────────

/// Logs every action and touches nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl ActionSink for LogSink {
    fn perform(&mut self, action: &Action) -> Result<(), SinkError> {
        info!(action = action.name(), "{}", action);
        Ok(())
    }
}

// ── recording sink ────────────────────────────────────────────────────────

/// Keeps every action it is given.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub actions: Vec<Action>,
}

impl ActionSink for RecordingSink {
    fn perform(&mut self, action: &Action) -> Result<(), SinkError> {
        self.actions.push(*action);
        Ok(())
    }
}

// ── enigo backend (feature = "os-input") ──────────────────────────────────

#[cfg(feature = "os-input")]
pub use os::EnigoSink;

#[cfg(feature = "os-input")]
mod os {
    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};

    use super::{ActionSink, SinkError};
    use gesture_engine::Action;

    /// Real mouse and keyboard events through `enigo`.
    pub struct EnigoSink {
        enigo: Enigo,
    }

    impl EnigoSink {
        pub fn new() -> Result<Self, SinkError> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| SinkError::Unavailable(format!("{:?}", e)))?;
            Ok(EnigoSink { enigo })
        }

        fn ctrl_chord(&mut self, c: char) -> enigo::InputResult<()> {
            self.enigo.key(Key::Control, Direction::Press)?;
            let tapped = self.enigo.key(Key::Unicode(c), Direction::Click);
            // Release even if the tap failed so Ctrl doesn't stick.
            self.enigo.key(Key::Control, Direction::Release)?;
            tapped
        }
    }

    impl ActionSink for EnigoSink {
        fn perform(&mut self, action: &Action) -> Result<(), SinkError> {
            let result = match *action {
                Action::MoveRelative { dx, dy } =>
                    self.enigo.move_mouse(dx, dy, Coordinate::Rel),
                // enigo scrolls down for positive lengths
                Action::ScrollUp { amount }     => self.enigo.scroll(-amount, Axis::Vertical),
                Action::ScrollDown { amount }   => self.enigo.scroll(amount, Axis::Vertical),
                Action::DoubleClick => self.enigo.button(Button::Left, Direction::Click)
                    .and_then(|_| self.enigo.button(Button::Left, Direction::Click)),
                Action::ZoomOut     => self.ctrl_chord('-'),
                Action::ZoomIn      => self.ctrl_chord('='),
                Action::VolumeUp    => self.enigo.key(Key::VolumeUp, Direction::Click),
                Action::VolumeDown  => self.enigo.key(Key::VolumeDown, Direction::Click),
            };
            result.map_err(|e| SinkError::Failed { action: action.name(), reason: e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.perform(&Action::ZoomIn).unwrap();
        sink.perform(&Action::MoveRelative { dx: -3, dy: 6 }).unwrap();
        assert_eq!(sink.actions, vec![Action::ZoomIn, Action::MoveRelative { dx: -3, dy: 6 }]);
    }

    #[test]
    fn boxed_sink_forwards() {
        let mut sink: Box<dyn ActionSink> = Box::new(LogSink);
        assert!(sink.perform(&Action::VolumeUp).is_ok());
    }

    #[test]
    fn error_messages() {
        let e = SinkError::Failed { action: "zoom-in", reason: "no display".into() };
        assert_eq!(e.to_string(), "zoom-in failed: no display");
    }
}
