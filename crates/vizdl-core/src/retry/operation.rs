use std::fmt;

/// What a retried closure is doing. Only used for diagnostics and to tell
/// a fatal page failure apart from a skippable download failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    PageFetch { page: u32 },
    EntryDownload { title: String },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::PageFetch { page } => write!(f, "fetch of catalog page {}", page),
            Operation::EntryDownload { title } => write!(f, "download of \"{}\"", title),
        }
    }
}
