//! # AutoScroll Bus
//!
//! The coordinator side of AutoScroll. [`CrossContextBus`] routes shortcut
//! and popup requests to the active page, caches each page's last published
//! state, and answers queries with a bounded wait. [`LocalPageHost`] runs
//! pages in-process on top of the engine.

mod bus;
mod cache;
mod host;
mod request;
mod shortcut;

pub use bus::CrossContextBus;
pub use cache::PageStateCache;
pub use host::LocalPageHost;
pub use request::UiRequest;
pub use shortcut::ShortcutBridge;
