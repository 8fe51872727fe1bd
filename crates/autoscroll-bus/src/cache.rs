//! Last-known state per page, kept by the coordinator.
//!
//! Entries are created or overwritten by every `STATE_UPDATE` and removed
//! only when the page reports it closed.

use dashmap::DashMap;

use autoscroll_protocols::{PageId, ScrollState};

#[derive(Debug, Clone, Copy, Default)]
struct CachedPage {
    state: Option<ScrollState>,
    bottom_hits: u64,
}

/// Thread-safe page state cache.
pub struct PageStateCache {
    pages: DashMap<PageId, CachedPage>,
}

impl PageStateCache {
    pub fn new() -> Self {
        Self {
            pages: DashMap::new(),
        }
    }

    /// Overwrite the cached state for `page`.
    pub fn report(&self, page: PageId, state: ScrollState) {
        self.pages.entry(page).or_default().state = Some(state);
    }

    pub fn get(&self, page: PageId) -> Option<ScrollState> {
        self.pages.get(&page).and_then(|entry| entry.state)
    }

    /// Count a bottom notification and return the page's running total.
    pub fn record_bottom(&self, page: PageId) -> u64 {
        let mut entry = self.pages.entry(page).or_default();
        entry.bottom_hits += 1;
        entry.bottom_hits
    }

    pub fn bottom_hits(&self, page: PageId) -> u64 {
        self.pages.get(&page).map_or(0, |entry| entry.bottom_hits)
    }

    /// Drop everything known about `page`. Returns whether it was known.
    pub fn forget(&self, page: PageId) -> bool {
        self.pages.remove(&page).is_some()
    }

    pub fn contains(&self, page: PageId) -> bool {
        self.pages.contains_key(&page)
    }

    /// Known pages, in ascending order.
    pub fn pages(&self) -> Vec<PageId> {
        let mut pages: Vec<_> = self.pages.iter().map(|entry| *entry.key()).collect();
        pages.sort();
        pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl Default for PageStateCache {
    fn default() -> Self {
        Self::new()
    }
}
