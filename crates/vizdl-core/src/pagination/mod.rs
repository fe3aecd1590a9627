//! Pagination and filter loop.
//!
//! Walks catalog pages from 1 upwards. Every page fetch and every download
//! goes through [`run_with_retry`]. A page that still fails after its retries
//! ends the run; a download that still fails is logged and skipped, as are
//! entries the catalog listed without a usable link. The walk stops at the
//! first page with no entries.

mod error;
mod summary;

pub use error::PaginationError;
pub use summary::RunSummary;

use crate::catalog::{Catalog, CatalogEntry};
use crate::filter::{DownloadFilter, SkipReason};
use crate::naming::destination_file_name;
use crate::retry::{run_with_retry, Operation, RetryExhausted, RetryPolicy};
use std::path::PathBuf;

/// First page requested by a run.
pub const FIRST_PAGE: u32 = 1;

/// Where the loop is. Each [`PaginationLoop::step`] consumes one state and
/// returns the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopState {
    FetchingPage { page: u32 },
    ProcessingEntries { page: u32, entries: Vec<CatalogEntry> },
    Done,
}

impl LoopState {
    pub fn start() -> Self {
        LoopState::FetchingPage { page: FIRST_PAGE }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, LoopState::Done)
    }
}

/// What happened to a single entry.
#[derive(Debug)]
pub enum EntryOutcome {
    Downloaded { path: PathBuf, bytes: u64 },
    Skipped(SkipReason),
    Failed(RetryExhausted),
}

type Observer<'a> = Box<dyn FnMut(&CatalogEntry, &EntryOutcome) + 'a>;

/// Drives the page walk against a [`Catalog`].
pub struct PaginationLoop<'a, C: Catalog> {
    catalog: &'a C,
    filter: DownloadFilter,
    policy: RetryPolicy,
    download_dir: PathBuf,
    summary: RunSummary,
    observer: Option<Observer<'a>>,
}

impl<'a, C: Catalog> PaginationLoop<'a, C> {
    pub fn new(
        catalog: &'a C,
        filter: DownloadFilter,
        policy: RetryPolicy,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalog,
            filter,
            policy,
            download_dir: download_dir.into(),
            summary: RunSummary::default(),
            observer: None,
        }
    }

    /// Called once per entry after it was downloaded, skipped or given up on.
    pub fn with_observer(mut self, observer: impl FnMut(&CatalogEntry, &EntryOutcome) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Runs from page 1 until a page comes back empty.
    pub fn run(mut self) -> Result<RunSummary, PaginationError> {
        let mut state = LoopState::start();
        while !state.is_done() {
            state = self.step(state)?;
        }
        tracing::info!(summary = %self.summary, "catalog walk finished");
        Ok(self.summary)
    }

    /// Advances the state machine by one transition.
    pub fn step(&mut self, state: LoopState) -> Result<LoopState, PaginationError> {
        match state {
            LoopState::FetchingPage { page } => self.fetch_page(page),
            LoopState::ProcessingEntries { page, entries } => {
                tracing::info!(page, entries = entries.len(), "processing page");
                for entry in &entries {
                    self.process_entry(entry);
                }
                Ok(LoopState::FetchingPage {
                    page: page.saturating_add(1),
                })
            }
            LoopState::Done => Ok(LoopState::Done),
        }
    }

    fn fetch_page(&mut self, page: u32) -> Result<LoopState, PaginationError> {
        let catalog = self.catalog;
        let operation = Operation::PageFetch { page };
        let fetched = run_with_retry(&self.policy, &operation, || catalog.fetch_page(page))
            .map_err(|e| {
                tracing::error!(page, error = %e, cause = %e.source, "page fetch failed; stopping");
                PaginationError::PageFetch(e)
            })?;
        self.summary.pages_fetched += 1;

        let malformed = fetched.malformed() as u64;
        if malformed > 0 {
            tracing::warn!(page, malformed, "skipping undecodable entries");
            self.summary.entries_seen += malformed;
            self.summary.skipped += malformed;
        }

        if fetched.is_empty() {
            tracing::info!(page, "empty page, no more entries");
            return Ok(LoopState::Done);
        }
        Ok(LoopState::ProcessingEntries {
            page,
            entries: fetched.into_entries(),
        })
    }

    /// Filters and downloads one entry. Never fails the run.
    fn process_entry(&mut self, entry: &CatalogEntry) {
        self.summary.entries_seen += 1;

        let verdict = if entry.download_url.trim().is_empty() {
            Err(SkipReason::NoDownloadLink)
        } else {
            self.filter.check(entry)
        };
        let outcome = match verdict {
            Err(reason) => {
                tracing::info!(title = %entry.title, %reason, "skipping");
                self.summary.skipped += 1;
                EntryOutcome::Skipped(reason)
            }
            Ok(()) => {
                let path = self.download_dir.join(destination_file_name(&entry.title));
                let catalog = self.catalog;
                let operation = Operation::EntryDownload {
                    title: entry.title.clone(),
                };
                match run_with_retry(&self.policy, &operation, || {
                    catalog.download(&entry.download_url, &path)
                }) {
                    Ok(bytes) => {
                        tracing::info!(title = %entry.title, path = %path.display(), bytes, "downloaded");
                        self.summary.downloaded += 1;
                        self.summary.bytes_written += bytes;
                        EntryOutcome::Downloaded { path, bytes }
                    }
                    Err(e) => {
                        tracing::error!(title = %entry.title, error = %e, cause = %e.source, "download failed; continuing");
                        self.summary.failed += 1;
                        EntryOutcome::Failed(e)
                    }
                }
            }
        };

        if let Some(observer) = self.observer.as_mut() {
            observer(entry, &outcome);
        }
    }
}
