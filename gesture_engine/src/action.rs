//! Input actions emitted by the engine.

use std::fmt;

use serde::Serialize;

/// A recognised, debounced control event, ready for an OS dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Move the cursor by `(dx, dy)` pixels.
    MoveRelative { dx: i32, dy: i32 },
    /// Scroll up by `amount` wheel units.
    ScrollUp { amount: i32 },
    ScrollDown { amount: i32 },
    DoubleClick,
    /// Ctrl + '='
    ZoomIn,
    /// Ctrl + '-'
    ZoomOut,
    VolumeUp,
    VolumeDown,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::MoveRelative { .. } => "move",
            Action::ScrollUp { .. }     => "scroll-up",
            Action::ScrollDown { .. }   => "scroll-down",
            Action::DoubleClick         => "double-click",
            Action::ZoomIn              => "zoom-in",
            Action::ZoomOut             => "zoom-out",
            Action::VolumeUp            => "volume-up",
            Action::VolumeDown          => "volume-down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::MoveRelative { dx, dy } => write!(f, "move ({dx:+}, {dy:+})"),
            Action::ScrollUp { amount }     => write!(f, "scroll-up {amount}"),
            Action::ScrollDown { amount }   => write!(f, "scroll-down {amount}"),
            other                           => f.write_str(other.name()),
        }
    }
}
