//! # AutoScroll Protocols
//!
//! Core protocol definitions shared by every execution context of AutoScroll.
//! Contains only data types and interface definitions - no implementations.
//!
//! ## Core Types
//!
//! - [`ScrollState`] - Snapshot published by a page's scroll controller
//! - [`Command`] - Command vocabulary accepted by a scroll controller
//! - [`PageEvent`] - Notifications a page sends to the coordinator
//! - [`BusReply`] - Soft-failure reply returned to UI observers
//!
//! ## Host Traits
//!
//! - [`ScrollContainer`] - A scrollable element inside a page
//! - [`PageDocument`] - The document a controller scrolls
//! - [`PageHost`] - Transport the coordinator uses to reach pages

pub mod command;
pub mod error;
pub mod host;
pub mod message;
pub mod state;

pub use command::{Command, RequestOrigin};
pub use error::DeliveryError;
pub use host::{InjectOutcome, PageDocument, PageHost, ScrollContainer};
pub use message::{BusErrorCode, BusReply, PageEvent, PageNotice, PageReply, PageRequest};
pub use state::{PageId, ScrollState};
