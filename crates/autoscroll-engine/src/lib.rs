//! # AutoScroll Engine
//!
//! The in-page half of AutoScroll.
//!
//! - [`controller`]: the scroll state machine and its per-frame tick
//! - [`session`]: frame timing, bottom detection, infinite-scroll heuristic
//! - [`runtime`]: one task per page, owning at most one controller
//! - [`broadcast`]: state publication to the coordinator and same-page observers
//! - [`frame`]: frame pacing on tokio time
//! - [`document`]: an in-memory document for simulation and tests

pub mod broadcast;
pub mod controller;
pub mod document;
pub mod frame;
pub mod runtime;
pub mod session;

pub use broadcast::{LocalEvent, StateBroadcast, StatePublisher};
pub use controller::{ScrollController, ScrollPhase, TickReport};
pub use document::{Geometry, SimulatedContainer, SimulatedDocument};
pub use frame::{FrameClock, FrameTicker};
pub use runtime::{OverlayPort, PageBuilder, PageEnvelope, PageHandle};
pub use session::{is_at_bottom, EngineSession};
