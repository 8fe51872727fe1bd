//! Error types for the AutoScroll protocol layer.

mod delivery;

pub use delivery::*;
