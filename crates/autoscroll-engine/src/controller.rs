//! Scroll controller - the per-page scrolling state machine.
//!
//! ## States
//!
//! ```text
//! Idle ──start──▶ Scrolling ──pause──▶ Paused
//!  ▲                 │  ▲                 │
//!  └─────stop────────┘  └─────resume──────┘
//!  ▲                                      │
//!  └──────────────────stop────────────────┘
//! ```
//!
//! ## Tick loop
//!
//! The controller never schedules frames itself. `start()` and `resume()`
//! arm the loop; each [`ScrollController::tick`] consumes the armed frame and
//! re-arms only if the controller is still scrolling afterwards, so `stop()`
//! and `pause()` take effect within one frame without a cancel handle.

use std::sync::Arc;

use tracing::{debug, trace};

use autoscroll_config::{ScrollConfig, ScrollDirection};
use autoscroll_protocols::{Command, PageDocument, PageId, ScrollContainer, ScrollState};

use crate::broadcast::StatePublisher;
use crate::session::EngineSession;

/// State machine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollPhase {
    Idle,
    Scrolling,
    Paused,
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Distance the container actually moved.
    pub advanced: f64,
    pub at_bottom: bool,
    pub suspected_infinite: bool,
}

/// Drives one page's scroll container.
pub struct ScrollController {
    scroll: ScrollConfig,
    phase: ScrollPhase,
    speed: f64,
    session: EngineSession,
    document: Arc<dyn PageDocument>,
    publisher: StatePublisher,
    frame_armed: bool,
}

impl ScrollController {
    /// Create an idle controller at the configured default speed.
    pub fn new(
        scroll: ScrollConfig,
        document: Arc<dyn PageDocument>,
        publisher: StatePublisher,
    ) -> Self {
        let speed = scroll.clamp_speed(scroll.default_speed);
        let session = EngineSession::new(scroll.threshold, scroll.growth_margin);
        Self {
            scroll,
            phase: ScrollPhase::Idle,
            speed,
            session,
            document,
            publisher,
            frame_armed: false,
        }
    }

    pub fn page(&self) -> PageId {
        self.publisher.page()
    }

    /// Current snapshot. No side effects.
    pub fn state(&self) -> ScrollState {
        ScrollState {
            is_scrolling: self.phase != ScrollPhase::Idle,
            is_paused: self.phase == ScrollPhase::Paused,
            speed: self.speed,
        }
    }

    pub fn phase(&self) -> ScrollPhase {
        self.phase
    }

    pub fn session(&self) -> &EngineSession {
        &self.session
    }

    /// Whether the loop wants the next frame.
    pub fn is_frame_armed(&self) -> bool {
        self.frame_armed
    }

    pub fn start(&mut self) {
        if self.phase != ScrollPhase::Idle {
            return;
        }
        let container = self.select_container();
        if container.is_none() {
            debug!("{}: no scrolling element, scrolling without effect", self.page());
        }
        self.session.begin(container);
        self.phase = ScrollPhase::Scrolling;
        self.frame_armed = true;
        debug!("{}: started at {} units/s", self.page(), self.speed);
        self.publish();
    }

    pub fn stop(&mut self) {
        self.phase = ScrollPhase::Idle;
        self.session.reset_timestamp();
        debug!("{}: stopped", self.page());
        self.publish();
    }

    pub fn pause(&mut self) {
        if self.phase != ScrollPhase::Scrolling {
            return;
        }
        self.phase = ScrollPhase::Paused;
        debug!("{}: paused", self.page());
        self.publish();
    }

    pub fn resume(&mut self) {
        if self.phase != ScrollPhase::Paused {
            return;
        }
        self.phase = ScrollPhase::Scrolling;
        // Time spent paused must not turn into one big jump.
        self.session.reset_timestamp();
        self.frame_armed = true;
        debug!("{}: resumed", self.page());
        self.publish();
    }

    pub fn toggle_start_stop(&mut self) {
        if self.phase == ScrollPhase::Idle {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn toggle_pause_resume(&mut self) {
        match self.phase {
            ScrollPhase::Idle => {}
            ScrollPhase::Scrolling => self.pause(),
            ScrollPhase::Paused => self.resume(),
        }
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = self.scroll.clamp_speed(speed);
        debug!("{}: speed set to {}", self.page(), self.speed);
        self.publish();
    }

    pub fn adjust_speed(&mut self, delta: f64) {
        self.set_speed(self.speed + delta);
    }

    /// Stop, then jump to the top of the container.
    pub fn scroll_to_top(&mut self) {
        self.stop();
        let container = self
            .session
            .container()
            .cloned()
            .or_else(|| self.select_container());
        if let Some(container) = container {
            container.set_scroll_offset(0.0);
        }
    }

    /// Apply a relayed command.
    pub fn apply(&mut self, command: Command) {
        trace!("{}: applying {}", self.page(), command.name());
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::ToggleStartStop => self.toggle_start_stop(),
            Command::TogglePauseResume => self.toggle_pause_resume(),
            Command::SetSpeed { speed } => self.set_speed(speed),
            Command::AdjustSpeed { delta } => self.adjust_speed(delta),
            Command::ScrollToTop => self.scroll_to_top(),
        }
    }

    /// Run one frame at timestamp `ts` (milliseconds).
    ///
    /// Returns `None` when the controller is not scrolling; such a frame is
    /// dropped and the loop stays disarmed.
    pub fn tick(&mut self, ts: f64) -> Option<TickReport> {
        self.frame_armed = false;
        if self.phase != ScrollPhase::Scrolling {
            return None;
        }

        let dt = self.session.elapsed_secs(ts);
        let delta = self.speed * dt * self.direction().sign();
        let advanced = self.session.advance(delta);

        let at_bottom = self.session.is_at_bottom();
        if at_bottom {
            self.publisher
                .publish_reached_bottom(self.session.suspected_infinite());
        }

        let suspected_infinite = self.session.detect_infinite_scroll();
        trace!(
            "{}: tick dt={:.4}s advanced={:.2} at_bottom={}",
            self.page(),
            dt,
            advanced,
            at_bottom
        );

        self.frame_armed = self.phase == ScrollPhase::Scrolling;
        Some(TickReport {
            advanced,
            at_bottom,
            suspected_infinite,
        })
    }

    fn direction(&self) -> ScrollDirection {
        self.scroll.direction
    }

    /// Prefer the document's own scrolling element.
    fn select_container(&self) -> Option<Arc<dyn ScrollContainer>> {
        self.document.scrolling_element()
    }

    fn publish(&self) {
        self.publisher.publish_state(self.state());
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
