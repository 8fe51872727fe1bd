//! Scroll state snapshot and page identity.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle addressing one monitored page's execution context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl PageId {
    /// Create a page identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page#{}", self.0)
    }
}

impl From<u64> for PageId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Immutable snapshot of a scroll controller, published on every change.
///
/// `is_paused` is only meaningful while `is_scrolling` is true; a paused
/// controller is always still scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollState {
    /// Whether the tick loop is driving the container.
    pub is_scrolling: bool,
    /// Whether advancement is frozen without ending the session.
    pub is_paused: bool,
    /// Speed in position units per second.
    pub speed: f64,
}

impl ScrollState {
    /// State of a controller that is not scrolling.
    pub fn idle(speed: f64) -> Self {
        Self {
            is_scrolling: false,
            is_paused: false,
            speed,
        }
    }

    /// Whether the snapshot respects `is_paused => is_scrolling`.
    pub fn is_consistent(&self) -> bool {
        !self.is_paused || self.is_scrolling
    }
}
