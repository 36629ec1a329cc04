//! # Timeline Cursor
//!
//! Steps through a resource's timeline one record at a time, loading
//! pages from the backend only when a step needs them.

use std::future::Future;

use crate::history::{self, ChangeRecord, HistoryError, Snapshot};
use crate::observability::{Event, Logger};

use super::envelope::Pagination;
use super::errors::ClientResult;

/// One page of timeline records
#[derive(Debug, Clone, PartialEq)]
pub struct TimelinePage {
    pub records: Vec<ChangeRecord>,
    pub pagination: Pagination,
}

/// Something that serves timeline pages (1-based)
pub trait PageSource {
    fn fetch_page(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = ClientResult<TimelinePage>> + Send;
}

/// Paginated view over one resource's timeline
///
/// A failed step leaves the cursor where it was.
#[derive(Debug)]
pub struct TimelineCursor<S> {
    source: S,
    limit: u32,
    records: Vec<ChangeRecord>,
    pagination: Pagination,
    last_loaded_page: u32,
    initial: Option<Snapshot>,
    state: Option<Snapshot>,
    active_step: usize,
}

impl<S: PageSource> TimelineCursor<S> {
    /// Load the first page and position the cursor on step 0.
    ///
    /// Fails with `EmptyTimeline` when the resource has no records.
    pub async fn open(source: S, limit: u32) -> ClientResult<Self> {
        let first = source.fetch_page(1, limit).await?;
        if first.records.is_empty() {
            return Err(HistoryError::EmptyTimeline.into());
        }

        let initial = history::initial_snapshot(&first.records)?;
        let mut cursor = Self {
            source,
            limit,
            records: first.records,
            pagination: first.pagination,
            last_loaded_page: 1,
            initial,
            state: None,
            active_step: 0,
        };
        cursor.state = cursor.rebuild(0)?;

        Ok(cursor)
    }

    /// Move to `step`, fetching any pages up to the one that holds it.
    pub async fn look_at(&mut self, step: usize) -> ClientResult<Option<&Snapshot>> {
        let total = self.total();
        if step >= total {
            return Err(HistoryError::StepOutOfRange { step, len: total }.into());
        }

        let needed_page = (step / self.limit.max(1) as usize) as u32 + 1;
        while self.last_loaded_page < needed_page {
            let next = self.last_loaded_page + 1;
            let page = self.source.fetch_page(next, self.limit).await?;
            let fetched = page.records.len();
            self.records.extend(page.records);
            self.pagination = page.pagination;
            self.last_loaded_page = next;
            if fetched == 0 {
                break;
            }
        }

        self.state = self.rebuild(step)?;
        self.active_step = step;

        Ok(self.state.as_ref())
    }

    /// Step forward, staying on the last step at the end
    pub async fn next(&mut self) -> ClientResult<Option<&Snapshot>> {
        let step = (self.active_step + 1).min(self.total().saturating_sub(1));
        self.look_at(step).await
    }

    /// Step back, staying on step 0 at the start
    pub async fn back(&mut self) -> ClientResult<Option<&Snapshot>> {
        let step = self.active_step.saturating_sub(1);
        self.look_at(step).await
    }

    fn rebuild(&self, step: usize) -> ClientResult<Option<Snapshot>> {
        match history::reconstruct(self.initial.as_ref(), &self.records, step) {
            Ok(state) => Ok(state),
            Err(e) => {
                let reason = e.to_string();
                let step_str = step.to_string();
                Logger::error(
                    Event::ReconstructFailed.as_str(),
                    &[
                        ("code", e.code()),
                        ("reason", reason.as_str()),
                        ("step", step_str.as_str()),
                    ],
                );
                Err(e.into())
            }
        }
    }

    /// Reconstructed state at the active step (`None` after a deletion)
    pub fn current_state(&self) -> Option<&Snapshot> {
        self.state.as_ref()
    }

    /// Record at the active step
    pub fn current_event(&self) -> Option<&ChangeRecord> {
        self.records.get(self.active_step)
    }

    pub fn active_step(&self) -> usize {
        self.active_step
    }

    /// Total records as reported by the backend
    pub fn total(&self) -> usize {
        (self.pagination.total as usize).max(self.records.len())
    }

    /// Records loaded so far
    pub fn loaded(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }
}
