use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use aprov_core::document::{ApprovalsApi, Document, FilterSet};
use aprov_core::error::Result;

use super::pager::{FetchOutcome, InFlight, PageState};
use crate::selection::SelectionSet;

#[derive(Default)]
struct FeedState {
    pages: PageState<Document>,
    last_filters: Option<FilterSet>,
}

/// Paginated, filter-scoped list of approval documents.
///
/// The list is always the concatenation of pages fetched under one filter
/// set since the last reset. A fetch arriving while another is in flight is
/// dropped and reports [`FetchOutcome::Skipped`].
///
/// On every successful reset the shared [`SelectionSet`] is brought back in
/// line with the new list: a filter change clears it, a same-filter refresh
/// keeps only documents that are still listed.
pub struct DocumentFeed {
    api: Arc<dyn ApprovalsApi>,
    selection: SelectionSet,
    state: RwLock<FeedState>,
    loading: InFlight,
}

impl DocumentFeed {
    pub fn new(api: Arc<dyn ApprovalsApi>, selection: SelectionSet) -> Self {
        Self {
            api,
            selection,
            state: RwLock::new(FeedState::default()),
            loading: InFlight::default(),
        }
    }

    /// Fetches page 1 (`reset`) or the next page under `filters`.
    ///
    /// Filters that differ from the last ones always start over at page 1,
    /// whatever `reset` says.
    ///
    /// On failure the error message is recorded and the current list is left
    /// untouched; the error is also returned.
    pub async fn fetch(&self, filters: FilterSet, reset: bool) -> Result<FetchOutcome> {
        let Some(_guard) = self.loading.try_acquire() else {
            tracing::debug!("[DocumentFeed] Fetch already in flight, dropping request");
            return Ok(FetchOutcome::Skipped);
        };

        let (reset, page_number, filters_changed) = {
            let state = self.state.read().await;
            let filters_changed = state.last_filters.as_ref() != Some(&filters);
            let reset = reset || filters_changed;
            (reset, state.pages.target_page(reset), filters_changed)
        };

        tracing::debug!(
            "[DocumentFeed] Fetching page {} (reset: {}, type: {:?}, status: {})",
            page_number,
            reset,
            filters.document_type,
            filters.document_status
        );

        match self.api.list_documents(&filters, page_number).await {
            Ok(page) => {
                let listed: HashSet<i64> = page.items.iter().map(|d| d.scr_id).collect();
                let count = {
                    let mut state = self.state.write().await;
                    let count = state.pages.apply(page, page_number, reset);
                    state.last_filters = Some(filters);
                    count
                };

                if reset {
                    if filters_changed {
                        self.selection.clear().await;
                    } else {
                        self.selection.retain(|d| listed.contains(&d.scr_id)).await;
                    }
                }

                tracing::info!(
                    "[DocumentFeed] Loaded page {} with {} document(s)",
                    page_number,
                    count
                );
                Ok(FetchOutcome::Loaded {
                    page: page_number,
                    count,
                })
            }
            Err(e) => {
                tracing::warn!("[DocumentFeed] Failed to fetch page {}: {}", page_number, e);
                self.state.write().await.pages.record_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Next page under the last filters, if the server reported one.
    pub async fn load_more(&self) -> Result<FetchOutcome> {
        let filters = {
            let state = self.state.read().await;
            match &state.last_filters {
                Some(filters) if state.pages.has_next => filters.clone(),
                _ => return Ok(FetchOutcome::Exhausted),
            }
        };
        self.fetch(filters, false).await
    }

    /// Reloads page 1 under the last filters. `None` when nothing was fetched yet.
    pub async fn refresh(&self) -> Option<Result<FetchOutcome>> {
        let filters = self.last_filters().await?;
        Some(self.fetch(filters, true).await)
    }

    pub async fn documents(&self) -> Vec<Document> {
        self.state.read().await.pages.items.clone()
    }

    pub async fn last_filters(&self) -> Option<FilterSet> {
        self.state.read().await.last_filters.clone()
    }

    pub async fn current_page(&self) -> u32 {
        self.state.read().await.pages.current_page
    }

    pub async fn has_next(&self) -> bool {
        self.state.read().await.pages.has_next
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.pages.error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }
}

#[cfg(test)]
#[path = "document_feed_test.rs"]
mod tests;
