//! Cross-context delivery errors.

use thiserror::Error;

use crate::state::PageId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    #[error("Page closed: {0}")]
    PageClosed(PageId),

    #[error("No controller present in {0}")]
    NoReceiver(PageId),

    #[error("Controller injection rejected for {page}: {reason}")]
    InjectionRejected { page: PageId, reason: String },

    #[error("Timed out waiting for {0}")]
    Timeout(PageId),
}

impl DeliveryError {
    /// The page the failed delivery was addressed to.
    pub fn page(&self) -> PageId {
        match self {
            Self::PageNotFound(page)
            | Self::PageClosed(page)
            | Self::NoReceiver(page)
            | Self::Timeout(page) => *page,
            Self::InjectionRejected { page, .. } => *page,
        }
    }
}
