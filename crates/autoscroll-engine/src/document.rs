//! In-memory page document used by the simulator and tests.
//!
//! Behaves like a browser scrolling element: the offset is clamped to the
//! scrollable range, and content can be appended to emulate lazy loading.

use std::sync::Arc;

use parking_lot::Mutex;

use autoscroll_protocols::{PageDocument, ScrollContainer};

/// Geometry of a simulated container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub offset: f64,
    pub visible: f64,
    pub total: f64,
}

impl Geometry {
    fn max_offset(&self) -> f64 {
        (self.total - self.visible).max(0.0)
    }
}

/// A scrollable element backed by plain numbers.
pub struct SimulatedContainer {
    geometry: Mutex<Geometry>,
}

impl SimulatedContainer {
    pub fn new(visible: f64, total: f64) -> Arc<Self> {
        Arc::new(Self {
            geometry: Mutex::new(Geometry {
                offset: 0.0,
                visible,
                total,
            }),
        })
    }

    pub fn geometry(&self) -> Geometry {
        *self.geometry.lock()
    }

    /// Grow the content, as a feed does when it loads another batch.
    pub fn append_content(&self, extent: f64) {
        self.geometry.lock().total += extent;
    }

    /// Replace the content extent, pulling the offset back into range.
    pub fn set_total_extent(&self, total: f64) {
        let mut geometry = self.geometry.lock();
        geometry.total = total;
        geometry.offset = geometry.offset.min(geometry.max_offset());
    }
}

impl ScrollContainer for SimulatedContainer {
    fn scroll_offset(&self) -> f64 {
        self.geometry.lock().offset
    }

    fn set_scroll_offset(&self, offset: f64) {
        let mut geometry = self.geometry.lock();
        geometry.offset = offset.max(0.0).min(geometry.max_offset());
    }

    fn visible_extent(&self) -> f64 {
        self.geometry.lock().visible
    }

    fn total_extent(&self) -> f64 {
        self.geometry.lock().total
    }
}

/// A document whose scrolling element is a [`SimulatedContainer`].
pub struct SimulatedDocument {
    element: Option<Arc<SimulatedContainer>>,
}

impl SimulatedDocument {
    pub fn new(element: Arc<SimulatedContainer>) -> Arc<Self> {
        Arc::new(Self {
            element: Some(element),
        })
    }

    /// A document with nothing to scroll.
    pub fn without_scrolling_element() -> Arc<Self> {
        Arc::new(Self { element: None })
    }
}

impl PageDocument for SimulatedDocument {
    fn scrolling_element(&self) -> Option<Arc<dyn ScrollContainer>> {
        self.element
            .clone()
            .map(|element| element as Arc<dyn ScrollContainer>)
    }
}
