use std::sync::Arc;
use tokio::sync::RwLock;

use serde_json::Value;

use aprov_core::document::{ApportionmentQuery, DocumentApi, DocumentItem, DocumentType};
use aprov_core::error::Result;

use super::pager::{FetchOutcome, InFlight, PageState};

/// Identifies the document whose items are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailKey {
    pub document_type: DocumentType,
    pub scr_id: i64,
}

#[derive(Default)]
struct DetailState {
    key: Option<DetailKey>,
    pages: PageState<DocumentItem>,
}

#[derive(Default)]
struct ApportionmentState {
    query: Option<ApportionmentQuery>,
    pages: PageState<Value>,
}

/// Paginated line items of a single document.
///
/// Same paging discipline as [`super::DocumentFeed`], keyed by document
/// type and `scr_id`. The type picks the item endpoint; both response shapes
/// are normalized into one item list.
pub struct DocumentDetailFeed {
    api: Arc<dyn DocumentApi>,
    page_size: u32,
    item_history_page_size: u32,
    state: RwLock<DetailState>,
    loading: InFlight,
    apportionment: RwLock<ApportionmentState>,
    apportionment_loading: InFlight,
}

impl DocumentDetailFeed {
    pub fn new(api: Arc<dyn DocumentApi>, page_size: u32, item_history_page_size: u32) -> Self {
        Self {
            api,
            page_size,
            item_history_page_size,
            state: RwLock::new(DetailState::default()),
            loading: InFlight::default(),
            apportionment: RwLock::new(ApportionmentState::default()),
            apportionment_loading: InFlight::default(),
        }
    }

    /// Fetches items of `document_type`/`scr_id`.
    ///
    /// Switching to another document always starts over from page 1, even
    /// when `reset` is false. Unknown type codes fail before any request.
    pub async fn fetch(&self, document_type: &str, scr_id: i64, reset: bool) -> Result<FetchOutcome> {
        let key = DetailKey {
            document_type: DocumentType::parse(document_type)?,
            scr_id,
        };

        let Some(_guard) = self.loading.try_acquire() else {
            tracing::debug!("[DocumentDetailFeed] Fetch already in flight, dropping request");
            return Ok(FetchOutcome::Skipped);
        };

        let (reset, page_number) = {
            let state = self.state.read().await;
            let reset = reset || state.key != Some(key);
            (reset, state.pages.target_page(reset))
        };

        let endpoint = key.document_type.item_endpoint();
        tracing::debug!(
            "[DocumentDetailFeed] Fetching {} items of {} page {}",
            endpoint,
            scr_id,
            page_number
        );

        match self
            .api
            .document_items(endpoint, scr_id, page_number, self.page_size, "")
            .await
        {
            Ok(response) => {
                let mut state = self.state.write().await;
                if reset {
                    state.key = Some(key);
                }
                let count = state.pages.apply(response.into_page(), page_number, reset);
                Ok(FetchOutcome::Loaded {
                    page: page_number,
                    count,
                })
            }
            Err(e) => {
                tracing::warn!("[DocumentDetailFeed] Failed to fetch items of {}: {}", scr_id, e);
                self.state.write().await.pages.record_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Next page of the current document, if any.
    pub async fn load_more(&self) -> Result<FetchOutcome> {
        let key = {
            let state = self.state.read().await;
            match state.key {
                Some(key) if state.pages.has_next => key,
                _ => return Ok(FetchOutcome::Exhausted),
            }
        };
        self.fetch(key.document_type.as_ref(), key.scr_id, false).await
    }

    /// Reloads page 1 of the current document.
    pub async fn refresh(&self) -> Option<Result<FetchOutcome>> {
        let key = self.key().await?;
        Some(self.fetch(key.document_type.as_ref(), key.scr_id, true).await)
    }

    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.key = None;
        state.pages.clear();
    }

    /// Approval history of a document, as returned by the server.
    pub async fn approval_history(&self, document_number: &str) -> Result<Value> {
        self.api.approval_history(document_number).await
    }

    /// Purchase history of a product, one page at a time.
    pub async fn item_history(&self, product_code: &str, page: u32) -> Result<Value> {
        self.api
            .item_history(product_code, page.max(1), self.item_history_page_size)
            .await
    }

    /// Additional information fields of one line item.
    pub async fn item_additional_info(
        &self,
        record_number: &str,
        item_number: &str,
        item_recno: i64,
    ) -> Result<Value> {
        self.api
            .item_additional_info(record_number, item_number, item_recno)
            .await
    }

    /// Attachment listing of a document. Files are never downloaded here.
    pub async fn attachments(&self, scr_id: i64, page: u32) -> Result<Value> {
        self.api
            .attachments(scr_id, page.max(1), self.page_size)
            .await
    }

    /// Fetches apportionment rows of `document_type`/`document_number`.
    ///
    /// Paged like the item list, with its own cursor and in-flight guard.
    /// Another document always starts over. Types without a split fail
    /// before any request.
    pub async fn fetch_apportionment(
        &self,
        document_type: &str,
        document_number: &str,
        reset: bool,
    ) -> Result<FetchOutcome> {
        let query = ApportionmentQuery::new(DocumentType::parse(document_type)?, document_number)?;
        self.fetch_apportionment_page(query, reset).await
    }

    /// Next apportionment page of the current document, if any.
    pub async fn load_more_apportionment(&self) -> Result<FetchOutcome> {
        let query = {
            let state = self.apportionment.read().await;
            match &state.query {
                Some(query) if state.pages.has_next => query.clone(),
                _ => return Ok(FetchOutcome::Exhausted),
            }
        };
        self.fetch_apportionment_page(query, false).await
    }

    async fn fetch_apportionment_page(
        &self,
        query: ApportionmentQuery,
        reset: bool,
    ) -> Result<FetchOutcome> {
        let Some(_guard) = self.apportionment_loading.try_acquire() else {
            tracing::debug!("[DocumentDetailFeed] Apportionment fetch already in flight");
            return Ok(FetchOutcome::Skipped);
        };

        let (reset, page_number) = {
            let state = self.apportionment.read().await;
            let reset = reset || state.query.as_ref() != Some(&query);
            (reset, state.pages.target_page(reset))
        };

        match self
            .api
            .apportionment(&query, page_number, self.page_size)
            .await
        {
            Ok(page) => {
                let mut state = self.apportionment.write().await;
                if reset {
                    state.query = Some(query);
                }
                let count = state.pages.apply(page, page_number, reset);
                Ok(FetchOutcome::Loaded {
                    page: page_number,
                    count,
                })
            }
            Err(e) => {
                tracing::warn!(
                    "[DocumentDetailFeed] Failed to fetch apportionment of {}: {}",
                    query.document_number,
                    e
                );
                self.apportionment
                    .write()
                    .await
                    .pages
                    .record_error(e.user_message());
                Err(e)
            }
        }
    }

    pub async fn apportionment_rows(&self) -> Vec<Value> {
        self.apportionment.read().await.pages.items.clone()
    }

    pub async fn apportionment_has_next(&self) -> bool {
        self.apportionment.read().await.pages.has_next
    }

    pub async fn apportionment_error(&self) -> Option<String> {
        self.apportionment.read().await.pages.error.clone()
    }

    pub async fn clear_apportionment(&self) {
        let mut state = self.apportionment.write().await;
        state.query = None;
        state.pages.clear();
    }

    pub async fn items(&self) -> Vec<DocumentItem> {
        self.state.read().await.pages.items.clone()
    }

    pub async fn key(&self) -> Option<DetailKey> {
        self.state.read().await.key
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
}
