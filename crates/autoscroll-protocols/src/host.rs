//! Host protocol definitions.
//!
//! These traits are the boundary between AutoScroll and whatever actually
//! renders pages: the scrollable geometry inside a page, and the transport
//! the coordinator uses to reach a page's execution context.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DeliveryError;
use crate::message::{PageReply, PageRequest};
use crate::state::PageId;

/// A scrollable element.
///
/// Offsets and extents are in position units (pixels for a browser host).
pub trait ScrollContainer: Send + Sync {
    /// Current scroll offset from the top.
    fn scroll_offset(&self) -> f64;

    /// Set the scroll offset. Hosts may clamp it to the scrollable range.
    fn set_scroll_offset(&self, offset: f64);

    /// Extent of the visible viewport.
    fn visible_extent(&self) -> f64;

    /// Total extent of the scrollable content.
    fn total_extent(&self) -> f64;
}

/// The document a scroll controller drives.
pub trait PageDocument: Send + Sync {
    /// The document's own scrolling element, if it has one.
    fn scrolling_element(&self) -> Option<Arc<dyn ScrollContainer>>;
}

/// Result of delivering the controller into a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectOutcome {
    /// A controller was constructed.
    Installed,
    /// The page already had one; nothing changed.
    AlreadyPresent,
}

/// Transport from the coordinator to page execution contexts.
#[async_trait]
pub trait PageHost: Send + Sync {
    /// The page currently focused by the user, if any.
    async fn active_page(&self) -> Option<PageId>;

    /// Deliver controller code into a page. Must be idempotent.
    async fn inject_controller(&self, page: PageId) -> Result<InjectOutcome, DeliveryError>;

    /// Deliver a request to the page's controller and wait for its reply.
    async fn deliver(&self, page: PageId, request: PageRequest) -> Result<PageReply, DeliveryError>;
}
