//! State publication.
//!
//! A controller publishes every state change on two paths:
//! - to the coordinator, as a [`PageNotice`] (cross-context, fire-and-forget)
//! - to same-page observers through a [`StateBroadcast`] channel
//!
//! Broadcast design:
//! - tokio broadcast channel, every subscriber receives every event
//! - lagging subscribers skip old events (only the latest state matters)

use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use autoscroll_protocols::{PageEvent, PageId, PageNotice, ScrollState};

/// Broadcast channel capacity.
pub const CHANNEL_CAPACITY: usize = 64;

/// Event delivered to same-page observers such as the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalEvent {
    State(ScrollState),
    ReachedBottom { suspected_infinite: bool },
}

/// Same-page publish/subscribe channel.
#[derive(Clone)]
pub struct StateBroadcast {
    tx: broadcast::Sender<LocalEvent>,
}

impl StateBroadcast {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LocalEvent> {
        self.tx.subscribe()
    }

    /// Send to current subscribers. Having none is not an error.
    pub fn send(&self, event: LocalEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for StateBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes a controller's notifications on both paths.
pub struct StatePublisher {
    page: PageId,
    runtime: Option<mpsc::UnboundedSender<PageNotice>>,
    local: StateBroadcast,
}

impl StatePublisher {
    pub fn new(
        page: PageId,
        runtime: mpsc::UnboundedSender<PageNotice>,
        local: StateBroadcast,
    ) -> Self {
        Self {
            page,
            runtime: Some(runtime),
            local,
        }
    }

    /// Publisher with no coordinator attached; only same-page observers hear it.
    pub fn detached(page: PageId, local: StateBroadcast) -> Self {
        Self {
            page,
            runtime: None,
            local,
        }
    }

    pub fn page(&self) -> PageId {
        self.page
    }

    pub fn publish_state(&self, state: ScrollState) {
        self.notify_runtime(PageEvent::StateUpdate { payload: state });
        self.local.send(LocalEvent::State(state));
    }

    pub fn publish_reached_bottom(&self, suspected_infinite: bool) {
        self.notify_runtime(PageEvent::ReachedBottom { suspected_infinite });
        self.local
            .send(LocalEvent::ReachedBottom { suspected_infinite });
    }

    fn notify_runtime(&self, event: PageEvent) {
        if let Some(runtime) = &self.runtime {
            if runtime.send(PageNotice::new(self.page, event)).is_err() {
                debug!("Coordinator gone, dropping notice from {}", self.page);
            }
        }
    }
}
