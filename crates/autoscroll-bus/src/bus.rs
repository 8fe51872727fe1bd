//! Cross-context coordinator.
//!
//! The bus is the only component that talks to every page. It makes sure a
//! controller exists before relaying external commands, caches the last
//! state each page published, and answers state queries without ever
//! blocking longer than the configured bound.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use autoscroll_config::{BusConfig, Config, ShortcutAction};
use autoscroll_protocols::{
    BusReply, Command, DeliveryError, InjectOutcome, PageEvent, PageHost, PageId, PageNotice,
    PageRequest, RequestOrigin, ScrollState,
};

use crate::cache::PageStateCache;
use crate::request::UiRequest;
use crate::shortcut::ShortcutBridge;

/// The single coordinator shared by all pages and UI observers.
pub struct CrossContextBus {
    host: Arc<dyn PageHost>,
    cache: PageStateCache,
    shortcuts: ShortcutBridge,
    timeouts: BusConfig,
    default_speed: f64,
}

impl CrossContextBus {
    pub fn new(host: Arc<dyn PageHost>, config: &Config) -> Self {
        Self {
            host,
            cache: PageStateCache::new(),
            shortcuts: ShortcutBridge::new(&config.shortcuts, config.scroll.step),
            timeouts: config.bus.clone(),
            default_speed: config.scroll.clamp_speed(config.scroll.default_speed),
        }
    }

    /// Spawn the loop that consumes page notices.
    ///
    /// The loop ends when every sender of `notices` is gone.
    pub fn start(self: &Arc<Self>, mut notices: mpsc::UnboundedReceiver<PageNotice>) -> JoinHandle<()> {
        let bus = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(notice) = notices.recv().await {
                bus.handle_notice(notice).await;
            }
            debug!("Page notice stream closed");
        })
    }

    /// Process one notice from a page.
    pub async fn handle_notice(&self, notice: PageNotice) {
        let PageNotice { page, event } = notice;
        match event {
            PageEvent::StateUpdate { payload } => self.report_state(page, payload),
            PageEvent::ReachedBottom { suspected_infinite } => {
                let hits = self.cache.record_bottom(page);
                debug!(
                    "{} reached bottom (hit {}, suspected infinite: {})",
                    page, hits, suspected_infinite
                );
            }
            PageEvent::Command { command } => {
                self.relay_command(page, command, RequestOrigin::Page).await;
            }
            PageEvent::Closed => {
                self.forget_page(page);
            }
        }
    }

    /// Make sure `page` has a controller. Idempotent.
    pub async fn ensure_controller_present(
        &self,
        page: PageId,
    ) -> Result<InjectOutcome, DeliveryError> {
        let outcome = self.host.inject_controller(page).await?;
        if outcome == InjectOutcome::Installed {
            debug!("Controller delivered into {}", page);
        }
        Ok(outcome)
    }

    /// Deliver `command` to `page`.
    ///
    /// Commands from the page itself skip the presence check. Failures come
    /// back as soft `BusReply` values.
    pub async fn relay_command(
        &self,
        page: PageId,
        command: Command,
        origin: RequestOrigin,
    ) -> BusReply {
        debug!("Relaying {} from {:?} to {}", command.name(), origin, page);

        let delivery = async {
            if origin.requires_controller_check() {
                self.ensure_controller_present(page).await?;
            }
            self.host.deliver(page, PageRequest::Command(command)).await
        };
        let result = match bounded(self.timeouts.relay_timeout(), page, delivery).await {
            Ok(_) => Ok(()),
            Err(err) => {
                warn!("Failed to relay {} to {}: {}", command.name(), page, err);
                Err(err)
            }
        };
        BusReply::from(result)
    }

    /// Overwrite the cached state for `page`.
    pub fn report_state(&self, page: PageId, state: ScrollState) {
        debug!(
            "{} state: scrolling={} paused={} speed={}",
            page, state.is_scrolling, state.is_paused, state.speed
        );
        self.cache.report(page, state);
    }

    /// Resolve `page`'s state: the cache first, then a bounded direct query,
    /// then the idle default. Never waits longer than the query timeout.
    pub async fn query_state(&self, page: PageId) -> ScrollState {
        if let Some(state) = self.cache.get(page) {
            return state;
        }

        let direct = async {
            self.ensure_controller_present(page).await?;
            self.host.deliver(page, PageRequest::QueryState).await
        };
        match bounded(self.timeouts.query_timeout(), page, direct).await {
            Ok(reply) => reply
                .payload
                .unwrap_or_else(|| ScrollState::idle(self.default_speed)),
            Err(err) => {
                debug!("No state for {} ({}), using default", page, err);
                ScrollState::idle(self.default_speed)
            }
        }
    }

    /// Handle a platform global shortcut by action.
    pub async fn handle_shortcut(&self, action: ShortcutAction) -> BusReply {
        let Some(page) = self.host.active_page().await else {
            debug!("Shortcut {:?} with no active page", action);
            return BusReply::no_active_tab();
        };
        let command = self.shortcuts.command_for(action);
        self.relay_command(page, command, RequestOrigin::Shortcut).await
    }

    /// Handle a key chord. `None` if the chord is not bound.
    pub async fn handle_chord(&self, chord: &str) -> Option<BusReply> {
        let action = self.shortcuts.action_for_chord(chord)?;
        Some(self.handle_shortcut(action).await)
    }

    /// Handle a request from the popup.
    pub async fn handle_ui_request(&self, request: UiRequest) -> BusReply {
        let Some(page) = self.host.active_page().await else {
            return BusReply::no_active_tab();
        };
        match request {
            UiRequest::QueryState => BusReply::with_state(Some(self.query_state(page).await)),
            UiRequest::Command(command) => {
                self.relay_command(page, command, RequestOrigin::Popup).await
            }
        }
    }

    /// A page asking for its own cached state. The payload is `None` when
    /// nothing has been published yet.
    pub fn handle_page_query(&self, page: PageId) -> BusReply {
        BusReply::with_state(self.cache.get(page))
    }

    /// Drop the cache entry of a closed page.
    pub fn forget_page(&self, page: PageId) -> bool {
        let known = self.cache.forget(page);
        if known {
            info!("Forgot {}", page);
        }
        known
    }

    pub fn cached_state(&self, page: PageId) -> Option<ScrollState> {
        self.cache.get(page)
    }

    /// Bottom notifications received from `page` so far.
    pub fn bottom_hits(&self, page: PageId) -> u64 {
        self.cache.bottom_hits(page)
    }

    pub fn shortcuts(&self) -> &ShortcutBridge {
        &self.shortcuts
    }
}

async fn bounded<T>(
    limit: Duration,
    page: PageId,
    delivery: impl Future<Output = Result<T, DeliveryError>>,
) -> Result<T, DeliveryError> {
    tokio::time::timeout(limit, delivery)
        .await
        .unwrap_or(Err(DeliveryError::Timeout(page)))
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
