//! Per-session scroll bookkeeping: frame timing, bottom detection and the
//! infinite-scroll heuristic.

use std::sync::Arc;

use autoscroll_protocols::ScrollContainer;

/// Whether the container's viewport is within `threshold` of the content end.
pub fn is_at_bottom(container: &dyn ScrollContainer, threshold: f64) -> bool {
    container.scroll_offset() + container.visible_extent() >= container.total_extent() - threshold
}

/// Mutable session state owned by one scroll controller.
///
/// A session begins on every `start()`; the container is re-selected and the
/// detection fields are reset at that point.
pub struct EngineSession {
    container: Option<Arc<dyn ScrollContainer>>,
    last_tick_timestamp: Option<f64>,
    threshold: f64,
    growth_margin: f64,
    bottom_hit_count: u64,
    last_scrollable_extent: Option<f64>,
    suspected_infinite: bool,
}

impl EngineSession {
    pub fn new(threshold: f64, growth_margin: f64) -> Self {
        Self {
            container: None,
            last_tick_timestamp: None,
            threshold,
            growth_margin,
            bottom_hit_count: 0,
            last_scrollable_extent: None,
            suspected_infinite: false,
        }
    }

    /// Begin a new session on `container`.
    pub fn begin(&mut self, container: Option<Arc<dyn ScrollContainer>>) {
        self.container = container;
        self.last_tick_timestamp = None;
        self.bottom_hit_count = 0;
        self.last_scrollable_extent = None;
        self.suspected_infinite = false;
    }

    pub fn container(&self) -> Option<&Arc<dyn ScrollContainer>> {
        self.container.as_ref()
    }

    /// Forget the previous frame so the next one measures from scratch.
    pub fn reset_timestamp(&mut self) {
        self.last_tick_timestamp = None;
    }

    /// Seconds elapsed since the previous frame, recording `ts` (milliseconds).
    ///
    /// The first frame after a reset reports zero.
    pub fn elapsed_secs(&mut self, ts: f64) -> f64 {
        let last = *self.last_tick_timestamp.get_or_insert(ts);
        self.last_tick_timestamp = Some(ts);
        (ts - last).max(0.0) / 1000.0
    }

    /// Move the container by `delta`. No container means no movement.
    pub fn advance(&self, delta: f64) -> f64 {
        match &self.container {
            Some(container) => {
                let before = container.scroll_offset();
                container.set_scroll_offset(before + delta);
                container.scroll_offset() - before
            }
            None => 0.0,
        }
    }

    pub fn is_at_bottom(&self) -> bool {
        self.container
            .as_deref()
            .is_some_and(|container| is_at_bottom(container, self.threshold))
    }

    /// Count a bottom hit and flag content growth since the previous one.
    ///
    /// Does nothing unless the container is at its bottom. Returns the
    /// (sticky) suspicion flag.
    pub fn detect_infinite_scroll(&mut self) -> bool {
        if !self.is_at_bottom() {
            return self.suspected_infinite;
        }
        let Some(extent) = self.container.as_ref().map(|c| c.total_extent()) else {
            return self.suspected_infinite;
        };

        self.bottom_hit_count += 1;
        if let Some(previous) = self.last_scrollable_extent {
            if extent > previous + self.growth_margin {
                self.suspected_infinite = true;
            }
        }
        self.last_scrollable_extent = Some(extent);
        self.suspected_infinite
    }

    pub fn last_tick_timestamp(&self) -> Option<f64> {
        self.last_tick_timestamp
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn bottom_hit_count(&self) -> u64 {
        self.bottom_hit_count
    }

    pub fn last_scrollable_extent(&self) -> Option<f64> {
        self.last_scrollable_extent
    }

    pub fn suspected_infinite(&self) -> bool {
        self.suspected_infinite
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
