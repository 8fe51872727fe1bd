//! Requests from UI observers such as the popup.

use autoscroll_protocols::Command;

/// A request that targets whichever page is currently active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiRequest {
    /// Read the active page's state.
    QueryState,
    /// Relay a command to the active page.
    Command(Command),
}

impl From<Command> for UiRequest {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}
