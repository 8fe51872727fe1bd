//! Page runtime - one page's execution context.
//!
//! A page runtime is a single tokio task that owns the page's controller (if
//! one has been injected) and processes, one at a time, either a message from
//! the coordinator or a frame. Frames are atomic with respect to commands
//! because both are handled by the same task.
//!
//! The runtime also holds the page's "already constructed" guard: injecting
//! a controller twice returns the existing one untouched.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use autoscroll_config::{Config, FrameConfig, ScrollConfig};
use autoscroll_protocols::{
    Command, DeliveryError, InjectOutcome, PageDocument, PageEvent, PageId, PageNotice,
    PageReply, PageRequest, ScrollState,
};

use crate::broadcast::{LocalEvent, StateBroadcast, StatePublisher};
use crate::controller::ScrollController;
use crate::frame::{FrameClock, FrameTicker};

/// Capacity of a page's inbound message queue.
const INBOX_CAPACITY: usize = 32;

/// Message delivered into a page's execution context.
pub enum PageEnvelope {
    /// Deliver the controller into the page.
    Inject {
        reply: oneshot::Sender<Result<InjectOutcome, DeliveryError>>,
    },
    /// Hand a request to the page's controller.
    Request {
        request: PageRequest,
        reply: oneshot::Sender<Result<PageReply, DeliveryError>>,
    },
    /// The page is unloading.
    Unload,
}

/// Builder for a page runtime.
pub struct PageBuilder {
    page: PageId,
    document: Arc<dyn PageDocument>,
    scroll: ScrollConfig,
    frames: FrameConfig,
    accepts_injection: bool,
}

impl PageBuilder {
    pub fn new(page: PageId, document: Arc<dyn PageDocument>) -> Self {
        Self {
            page,
            document,
            scroll: ScrollConfig::default(),
            frames: FrameConfig::default(),
            accepts_injection: true,
        }
    }

    /// Use the scroll and frame sections of `config`.
    pub fn config(mut self, config: &Config) -> Self {
        self.scroll = config.scroll.clone();
        self.frames = config.frames.clone();
        self
    }

    /// Refuse controller injection, like a browser-internal page.
    pub fn restricted(mut self) -> Self {
        self.accepts_injection = false;
        self
    }

    /// Spawn the page task. Notices go to `runtime_tx`.
    pub fn spawn(self, runtime_tx: mpsc::UnboundedSender<PageNotice>) -> PageHandle {
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let local = StateBroadcast::new();

        let handle = PageHandle {
            page: self.page,
            tx,
            local: local.clone(),
            runtime_tx: runtime_tx.clone(),
            overlay_enabled: self.scroll.overlay_enabled,
            overlay_step: self.scroll.overlay_step,
        };

        let runtime = PageRuntime {
            page: self.page,
            scroll: self.scroll,
            frames: self.frames,
            document: self.document,
            accepts_injection: self.accepts_injection,
            controller: None,
            runtime_tx,
            local,
            rx,
        };
        tokio::spawn(runtime.run());

        handle
    }
}

/// The task side of a page.
struct PageRuntime {
    page: PageId,
    scroll: ScrollConfig,
    frames: FrameConfig,
    document: Arc<dyn PageDocument>,
    accepts_injection: bool,
    controller: Option<ScrollController>,
    runtime_tx: mpsc::UnboundedSender<PageNotice>,
    local: StateBroadcast,
    rx: mpsc::Receiver<PageEnvelope>,
}

impl PageRuntime {
    async fn run(mut self) {
        let clock = FrameClock::new();
        let mut ticker = FrameTicker::new(self.frames.interval());
        debug!("{} loaded", self.page);

        loop {
            let armed = self
                .controller
                .as_ref()
                .is_some_and(|controller| controller.is_frame_armed());

            tokio::select! {
                biased;
                envelope = self.rx.recv() => match envelope {
                    Some(PageEnvelope::Unload) | None => break,
                    Some(envelope) => self.handle(envelope),
                },
                _ = ticker.next_frame(), if armed => {
                    if let Some(controller) = self.controller.as_mut() {
                        controller.tick(clock.now_ms());
                    }
                }
            }
        }

        if self
            .runtime_tx
            .send(PageNotice::new(self.page, PageEvent::Closed))
            .is_err()
        {
            debug!("Coordinator gone before {} unloaded", self.page);
        }
        debug!("{} unloaded", self.page);
    }

    fn handle(&mut self, envelope: PageEnvelope) {
        match envelope {
            PageEnvelope::Inject { reply } => {
                let _ = reply.send(self.inject());
            }
            PageEnvelope::Request { request, reply } => {
                let _ = reply.send(self.serve(request));
            }
            PageEnvelope::Unload => {}
        }
    }

    fn inject(&mut self) -> Result<InjectOutcome, DeliveryError> {
        if !self.accepts_injection {
            warn!("{} refused controller injection", self.page);
            return Err(DeliveryError::InjectionRejected {
                page: self.page,
                reason: "page does not accept scripts".to_string(),
            });
        }
        if self.controller.is_some() {
            debug!("{}: controller already initialized", self.page);
            return Ok(InjectOutcome::AlreadyPresent);
        }

        let publisher =
            StatePublisher::new(self.page, self.runtime_tx.clone(), self.local.clone());
        self.controller = Some(ScrollController::new(
            self.scroll.clone(),
            self.document.clone(),
            publisher,
        ));
        info!("{}: controller initialized", self.page);
        Ok(InjectOutcome::Installed)
    }

    fn serve(&mut self, request: PageRequest) -> Result<PageReply, DeliveryError> {
        let controller = self
            .controller
            .as_mut()
            .ok_or(DeliveryError::NoReceiver(self.page))?;
        match request {
            PageRequest::Command(command) => {
                controller.apply(command);
                Ok(PageReply::ack())
            }
            PageRequest::QueryState => Ok(PageReply::state(controller.state())),
        }
    }
}

/// Coordinator-side handle to a page's execution context.
#[derive(Clone)]
pub struct PageHandle {
    page: PageId,
    tx: mpsc::Sender<PageEnvelope>,
    local: StateBroadcast,
    runtime_tx: mpsc::UnboundedSender<PageNotice>,
    overlay_enabled: bool,
    overlay_step: f64,
}

impl PageHandle {
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Deliver the controller into the page. Idempotent.
    pub async fn inject(&self) -> Result<InjectOutcome, DeliveryError> {
        let (reply, rx) = oneshot::channel();
        self.send(PageEnvelope::Inject { reply }).await?;
        rx.await.map_err(|_| DeliveryError::PageClosed(self.page))?
    }

    /// Deliver a request and wait for the page's reply.
    pub async fn request(&self, request: PageRequest) -> Result<PageReply, DeliveryError> {
        let (reply, rx) = oneshot::channel();
        self.send(PageEnvelope::Request { request, reply }).await?;
        rx.await.map_err(|_| DeliveryError::PageClosed(self.page))?
    }

    /// Unload the page. Later deliveries fail with `PageClosed`.
    pub async fn unload(&self) {
        let _ = self.tx.send(PageEnvelope::Unload).await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Subscribe to the page's local state broadcast.
    pub fn subscribe(&self) -> broadcast::Receiver<LocalEvent> {
        self.local.subscribe()
    }

    /// The on-page control panel, when enabled.
    pub fn overlay(&self) -> Option<OverlayPort> {
        self.overlay_enabled.then(|| OverlayPort {
            page: self.page,
            runtime_tx: self.runtime_tx.clone(),
            events: self.local.subscribe(),
            step: self.overlay_step,
        })
    }

    async fn send(&self, envelope: PageEnvelope) -> Result<(), DeliveryError> {
        self.tx
            .send(envelope)
            .await
            .map_err(|_| DeliveryError::PageClosed(self.page))
    }
}

/// The boundary the on-page control panel talks through.
///
/// Button presses go to the coordinator, which relays them back to this
/// page without re-injecting; state arrives over the local broadcast.
pub struct OverlayPort {
    page: PageId,
    runtime_tx: mpsc::UnboundedSender<PageNotice>,
    events: broadcast::Receiver<LocalEvent>,
    step: f64,
}

impl OverlayPort {
    pub fn toggle_start_stop(&self) -> bool {
        self.send(Command::ToggleStartStop)
    }

    pub fn toggle_pause_resume(&self) -> bool {
        self.send(Command::TogglePauseResume)
    }

    pub fn speed_up(&self) -> bool {
        self.send(Command::AdjustSpeed { delta: self.step })
    }

    pub fn speed_down(&self) -> bool {
        self.send(Command::AdjustSpeed { delta: -self.step })
    }

    pub fn scroll_to_top(&self) -> bool {
        self.send(Command::ScrollToTop)
    }

    /// Wait for the next state published on this page.
    pub async fn next_state(&mut self) -> Option<ScrollState> {
        loop {
            match self.events.recv().await {
                Ok(LocalEvent::State(state)) => return Some(state),
                Ok(LocalEvent::ReachedBottom { .. }) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("{}: overlay skipped {} events", self.page, skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn send(&self, command: Command) -> bool {
        self.runtime_tx
            .send(PageNotice::new(self.page, PageEvent::Command { command }))
            .is_ok()
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
