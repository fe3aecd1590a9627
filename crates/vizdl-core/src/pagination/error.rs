use crate::retry::{Operation, RetryExhausted};

/// Fatal for the whole run: the loop cannot continue without the page.
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    #[error("cannot continue pagination")]
    PageFetch(#[source] RetryExhausted),
}

impl PaginationError {
    /// Page number whose fetch failed.
    pub fn page(&self) -> Option<u32> {
        match self {
            PaginationError::PageFetch(e) => match &e.operation {
                Operation::PageFetch { page } => Some(*page),
                Operation::EntryDownload { .. } => None,
            },
        }
    }
}
