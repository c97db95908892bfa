//! Windowed feed loader: grows the scene window one page at a time.
//!
//! The loader never performs I/O itself. [`WindowedFeedLoader::append_if_needed`]
//! hands out a [`FetchRequest`] when the active index gets close enough to the
//! end of the window, and the caller reports the provider's answer back through
//! [`WindowedFeedLoader::complete`]. At most one request is in flight at a time.

use std::ops::Range;

use serde::Serialize;
use stashtv_contracts::source::SourceError;
use stashtv_model::{RawScene, SceneRecord};

use crate::normalize::normalize_batch;
use crate::window::FeedWindow;

/// Snapshot of how far the window has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FetchCursor {
    /// Scenes appended to the window so far.
    pub loaded_count: usize,
    pub pending_request: bool,
}

/// One page to pull from the backing provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Correlates the completion with this request.
    pub id: u64,
    /// Raw provider offset. Differs from the window length once invalid
    /// records have been dropped.
    pub offset: usize,
    pub count: usize,
}

/// What a completed fetch did to the window.
#[derive(Debug, Clone)]
pub enum BatchOutcome {
    Appended {
        range: Range<usize>,
        dropped: usize,
    },
    /// The provider has nothing more, or the scene cap was reached.
    Exhausted,
    /// The provider failed; the next qualifying call retries.
    Failed(SourceError),
    /// Completion for a request that is no longer in flight.
    Stale,
}

#[derive(Debug)]
pub struct WindowedFeedLoader {
    window: FeedWindow,
    page_size: usize,
    prefetch_margin: usize,
    max_scenes: Option<usize>,
    source_offset: usize,
    in_flight: Option<FetchRequest>,
    exhausted: bool,
    next_request_id: u64,
}

impl WindowedFeedLoader {
    pub fn new(
        page_size: usize,
        prefetch_margin: usize,
        max_scenes: Option<usize>,
    ) -> Self {
        Self {
            window: FeedWindow::new(),
            page_size: page_size.max(1),
            prefetch_margin,
            max_scenes,
            source_offset: 0,
            in_flight: None,
            exhausted: false,
            next_request_id: 1,
        }
    }

    pub fn window(&self) -> &FeedWindow {
        &self.window
    }

    pub fn scene(&self, index: usize) -> Option<&SceneRecord> {
        self.window.get(index)
    }

    pub fn cursor(&self) -> FetchCursor {
        FetchCursor {
            loaded_count: self.window.len(),
            pending_request: self.in_flight.is_some(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn in_flight(&self) -> Option<FetchRequest> {
        self.in_flight
    }

    /// Request the first page of an empty window.
    pub fn prime(&mut self) -> Option<FetchRequest> {
        if !self.window.is_empty() {
            return None;
        }
        self.try_issue()
    }

    /// Request the next page if `active_index` is within the prefetch margin
    /// of the end of the window. Repeated calls while a request is in flight
    /// return `None`.
    pub fn append_if_needed(
        &mut self,
        active_index: usize,
    ) -> Option<FetchRequest> {
        let loaded = self.window.len();
        if active_index < loaded.saturating_sub(self.prefetch_margin) {
            return None;
        }
        self.try_issue()
    }

    fn try_issue(&mut self) -> Option<FetchRequest> {
        if self.exhausted {
            return None;
        }
        if let Some(pending) = self.in_flight {
            tracing::trace!(
                request = pending.id,
                "fetch already in flight, not issuing another"
            );
            return None;
        }

        let mut count = self.page_size;
        if let Some(max) = self.max_scenes {
            let room = max.saturating_sub(self.window.len());
            if room == 0 {
                tracing::debug!(max, "scene cap reached, feed exhausted");
                self.exhausted = true;
                return None;
            }
            count = count.min(room);
        }

        let request = FetchRequest {
            id: self.next_request_id,
            offset: self.source_offset,
            count,
        };
        self.next_request_id += 1;
        self.in_flight = Some(request);
        tracing::debug!(
            request = request.id,
            offset = request.offset,
            count = request.count,
            "requesting next feed page"
        );
        Some(request)
    }

    /// Fold a provider answer into the window.
    pub fn complete(
        &mut self,
        request_id: u64,
        result: Result<Vec<RawScene>, SourceError>,
    ) -> BatchOutcome {
        match self.in_flight {
            Some(pending) if pending.id == request_id => {}
            _ => {
                tracing::warn!(
                    request = request_id,
                    "ignoring completion for a request that is not in flight"
                );
                return BatchOutcome::Stale;
            }
        }
        self.in_flight = None;

        let batch = match result {
            Ok(batch) => batch,
            Err(err) => {
                tracing::warn!(
                    request = request_id,
                    "feed fetch failed, will retry on next scroll: {err}"
                );
                return BatchOutcome::Failed(err);
            }
        };

        if batch.is_empty() {
            tracing::info!(
                loaded = self.window.len(),
                "provider returned an empty page, feed exhausted"
            );
            self.exhausted = true;
            return BatchOutcome::Exhausted;
        }

        let received = batch.len();
        self.source_offset += received;
        let mut scenes = normalize_batch(batch);
        let dropped = received - scenes.len();

        if let Some(max) = self.max_scenes {
            let room = max.saturating_sub(self.window.len());
            scenes.truncate(room);
        }

        let range = self.window.append_batch(scenes);
        if let Some(max) = self.max_scenes
            && self.window.len() >= max
        {
            tracing::debug!(max, "scene cap reached, feed exhausted");
            self.exhausted = true;
        }

        tracing::debug!(
            start = range.start,
            end = range.end,
            dropped,
            "appended feed page"
        );
        BatchOutcome::Appended { range, dropped }
    }
}
