//! In-process page host.
//!
//! Every page is an engine [`PageHandle`] running on the same tokio runtime.
//! Opening a page focuses it, like opening a browser tab.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, info};

use autoscroll_config::Config;
use autoscroll_engine::{PageBuilder, PageHandle};
use autoscroll_protocols::{
    DeliveryError, InjectOutcome, PageDocument, PageHost, PageId, PageNotice, PageReply,
    PageRequest,
};

/// [`PageHost`] backed by engine page runtimes.
pub struct LocalPageHost {
    config: Config,
    pages: DashMap<PageId, PageHandle>,
    active: RwLock<Option<PageId>>,
    next_id: AtomicU64,
    runtime_tx: mpsc::UnboundedSender<PageNotice>,
}

impl LocalPageHost {
    /// Create a host. The receiver carries every page's notices and is
    /// meant for the coordinator.
    pub fn new(config: &Config) -> (Arc<Self>, mpsc::UnboundedReceiver<PageNotice>) {
        let (runtime_tx, runtime_rx) = mpsc::unbounded_channel();
        let host = Arc::new(Self {
            config: config.clone(),
            pages: DashMap::new(),
            active: RwLock::new(None),
            next_id: AtomicU64::new(1),
            runtime_tx,
        });
        (host, runtime_rx)
    }

    /// Open and focus a page that accepts the controller.
    pub fn open_page(&self, document: Arc<dyn PageDocument>) -> PageHandle {
        self.open(PageBuilder::new(self.allocate_id(), document))
    }

    /// Open and focus a page that refuses script injection.
    pub fn open_restricted_page(&self, document: Arc<dyn PageDocument>) -> PageHandle {
        self.open(PageBuilder::new(self.allocate_id(), document).restricted())
    }

    /// Close a page. Its runtime reports `PAGE_CLOSED` on the way out.
    pub async fn close_page(&self, page: PageId) -> bool {
        let Some((_, handle)) = self.pages.remove(&page) else {
            return false;
        };
        {
            let mut active = self.active.write();
            if *active == Some(page) {
                *active = None;
            }
        }
        handle.unload().await;
        info!("Closed {}", page);
        true
    }

    /// Focus `page`. Returns false if it is not open.
    pub fn set_active(&self, page: PageId) -> bool {
        if !self.pages.contains_key(&page) {
            return false;
        }
        *self.active.write() = Some(page);
        debug!("Focused {}", page);
        true
    }

    /// Leave no page focused, as when a browser-internal window has focus.
    pub fn clear_active(&self) {
        *self.active.write() = None;
    }

    pub fn page(&self, page: PageId) -> Option<PageHandle> {
        self.pages.get(&page).map(|handle| handle.clone())
    }

    /// Open pages, in ascending order.
    pub fn pages(&self) -> Vec<PageId> {
        let mut pages: Vec<_> = self.pages.iter().map(|entry| *entry.key()).collect();
        pages.sort();
        pages
    }

    fn allocate_id(&self) -> PageId {
        PageId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn open(&self, builder: PageBuilder) -> PageHandle {
        let handle = builder.config(&self.config).spawn(self.runtime_tx.clone());
        let page = handle.page();
        self.pages.insert(page, handle.clone());
        *self.active.write() = Some(page);
        info!("Opened {}", page);
        handle
    }

    fn handle(&self, page: PageId) -> Result<PageHandle, DeliveryError> {
        self.page(page).ok_or(DeliveryError::PageNotFound(page))
    }
}

#[async_trait]
impl PageHost for LocalPageHost {
    async fn active_page(&self) -> Option<PageId> {
        let active = (*self.active.read())?;
        self.pages.contains_key(&active).then_some(active)
    }

    async fn inject_controller(&self, page: PageId) -> Result<InjectOutcome, DeliveryError> {
        self.handle(page)?.inject().await
    }

    async fn deliver(&self, page: PageId, request: PageRequest) -> Result<PageReply, DeliveryError> {
        self.handle(page)?.request(request).await
    }
}
