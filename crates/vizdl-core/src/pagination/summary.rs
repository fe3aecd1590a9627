use std::fmt;

/// Counters accumulated over one run of the pagination loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Successful page fetches, including the final empty page.
    pub pages_fetched: u32,
    pub entries_seen: u64,
    pub downloaded: u64,
    /// Entries rejected by the filter, listed without a link, or undecodable.
    pub skipped: u64,
    /// Entries whose download exhausted its retries.
    pub failed: u64,
    pub bytes_written: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} page(s), {} entr{} seen: {} downloaded ({:.1} MiB), {} skipped, {} failed",
            self.pages_fetched,
            self.entries_seen,
            if self.entries_seen == 1 { "y" } else { "ies" },
            self.downloaded,
            self.bytes_written as f64 / 1_048_576.0,
            self.skipped,
            self.failed
        )
    }
}
