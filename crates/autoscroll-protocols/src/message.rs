//! Messages exchanged between pages, the coordinator and UI observers.
//!
//! ## Directions
//!
//! - **PageRequest / PageReply**: coordinator -> page, with a reply
//! - **PageNotice**: page -> coordinator, fire-and-forget
//! - **BusReply**: coordinator -> UI observer (popup, shortcut bridge)

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::error::DeliveryError;
use crate::state::{PageId, ScrollState};

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;

/// Request delivered into a page's execution context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageRequest {
    /// Apply a command to the page's controller.
    Command(Command),
    /// Ask the controller for its current state.
    QueryState,
}

impl From<Command> for PageRequest {
    fn from(command: Command) -> Self {
        Self::Command(command)
    }
}

/// Reply from a page's execution context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageReply {
    pub ok: bool,
    pub payload: Option<ScrollState>,
}

impl PageReply {
    /// Acknowledge a command.
    pub fn ack() -> Self {
        Self {
            ok: true,
            payload: None,
        }
    }

    /// Reply carrying a state snapshot.
    pub fn state(state: ScrollState) -> Self {
        Self {
            ok: true,
            payload: Some(state),
        }
    }
}

/// Notification emitted by a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageEvent {
    /// The controller published a new state.
    StateUpdate { payload: ScrollState },
    /// A frame ended with the container at its bottom.
    ReachedBottom {
        #[serde(rename = "suspectedInfinite")]
        suspected_infinite: bool,
    },
    /// The page's control panel asked for a command to be relayed back.
    Command { command: Command },
    /// The page was closed or navigated away; its controller is gone.
    #[serde(rename = "PAGE_CLOSED")]
    Closed,
}

/// A page event tagged with its sender.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageNotice {
    pub page: PageId,
    pub event: PageEvent,
}

impl PageNotice {
    pub fn new(page: PageId, event: PageEvent) -> Self {
        Self { page, event }
    }
}

/// Machine-readable reason for a soft failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusErrorCode {
    /// No page is active to receive the request.
    NoActiveTab,
    /// The controller could not be delivered into the page.
    InjectFailed,
    /// The page did not accept or answer the message.
    DeliveryFailed,
}

impl From<&DeliveryError> for BusErrorCode {
    fn from(err: &DeliveryError) -> Self {
        match err {
            DeliveryError::InjectionRejected { .. } => Self::InjectFailed,
            _ => Self::DeliveryFailed,
        }
    }
}

/// Reply returned to UI observers. Failures are values, never panics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BusReply {
    pub ok: bool,
    #[serde(default)]
    pub payload: Option<ScrollState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<BusErrorCode>,
}

impl BusReply {
    /// Successful reply without payload.
    pub fn ok() -> Self {
        Self {
            ok: true,
            payload: None,
            error: None,
        }
    }

    /// Successful reply carrying an optional state.
    pub fn with_state(state: Option<ScrollState>) -> Self {
        Self {
            ok: true,
            payload: state,
            error: None,
        }
    }

    /// Soft failure.
    pub fn failed(code: BusErrorCode) -> Self {
        Self {
            ok: false,
            payload: None,
            error: Some(code),
        }
    }

    /// The "no active target" outcome; observers must not update optimistically.
    pub fn no_active_tab() -> Self {
        Self::failed(BusErrorCode::NoActiveTab)
    }
}

impl From<Result<(), DeliveryError>> for BusReply {
    fn from(result: Result<(), DeliveryError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => Self::failed(BusErrorCode::from(&err)),
        }
    }
}
