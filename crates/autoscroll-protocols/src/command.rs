//! Command vocabulary accepted by a page's scroll controller.

use serde::{Deserialize, Serialize};

/// A command addressed to one page's scroll controller.
///
/// Wire form is `{"type": "SET_SPEED", "speed": 800}` and so on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Start,
    Stop,
    Pause,
    Resume,
    ToggleStartStop,
    TogglePauseResume,
    SetSpeed { speed: f64 },
    AdjustSpeed { delta: f64 },
    /// Stop scrolling and jump back to the top of the container.
    ScrollToTop,
}

impl Command {
    /// Short, stable name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::ToggleStartStop => "toggle_start_stop",
            Self::TogglePauseResume => "toggle_pause_resume",
            Self::SetSpeed { .. } => "set_speed",
            Self::AdjustSpeed { .. } => "adjust_speed",
            Self::ScrollToTop => "scroll_to_top",
        }
    }
}

/// Where a relayed command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOrigin {
    /// A platform global shortcut.
    Shortcut,
    /// The popup UI.
    Popup,
    /// The page itself (its control panel), which already has a controller.
    Page,
}

impl RequestOrigin {
    /// Whether the coordinator must make sure a controller exists before relaying.
    pub fn requires_controller_check(&self) -> bool {
        !matches!(self, Self::Page)
    }
}
