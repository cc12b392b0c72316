//! Branch (filial) list and the persisted branch choice.

use std::sync::Arc;
use tokio::sync::RwLock;

use serde::{Deserialize, Serialize};

use aprov_core::branch::{Branch, BranchApi};
use aprov_core::error::Result;
use aprov_core::storage::{BRANCH_STORAGE_KEY, KeyValueStore, load_json, save_json};

use crate::feed::{FetchOutcome, InFlight, PageState};

/// Record kept under `branch-storage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedBranch {
    pub selected_branch: Option<Branch>,
}

#[derive(Default)]
struct DirectoryState {
    pages: PageState<Branch>,
    selected: Option<Branch>,
    hydrated: bool,
}

/// Paginated branch list with the user's selected branch.
pub struct BranchDirectory {
    api: Arc<dyn BranchApi>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<DirectoryState>,
    loading: InFlight,
}

impl BranchDirectory {
    pub fn new(api: Arc<dyn BranchApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(DirectoryState::default()),
            loading: InFlight::default(),
        }
    }

    pub async fn hydrate(&self) -> Result<()> {
        let persisted: PersistedBranch = load_json(self.store.as_ref(), BRANCH_STORAGE_KEY)
            .await?
            .unwrap_or_default();
        let mut state = self.state.write().await;
        state.selected = persisted.selected_branch;
        state.hydrated = true;
        Ok(())
    }

    /// Loads page 1 (`reset`) or the next page.
    ///
    /// A non-reset call after the last page is a no-op.
    pub async fn fetch(&self, reset: bool) -> Result<FetchOutcome> {
        let Some(_guard) = self.loading.try_acquire() else {
            return Ok(FetchOutcome::Skipped);
        };

        let page_number = {
            let state = self.state.read().await;
            if !reset && !state.pages.has_next && !state.pages.items.is_empty() {
                return Ok(FetchOutcome::Exhausted);
            }
            state.pages.target_page(reset)
        };

        match self.api.list_branches(page_number).await {
            Ok(page) => {
                let count = self
                    .state
                    .write()
                    .await
                    .pages
                    .apply(page, page_number, reset);
                tracing::debug!("[BranchDirectory] Loaded page {} ({} branches)", page_number, count);
                Ok(FetchOutcome::Loaded {
                    page: page_number,
                    count,
                })
            }
            Err(e) => {
                tracing::warn!("[BranchDirectory] Failed to load branches: {}", e);
                self.state.write().await.pages.record_error(e.user_message());
                Err(e)
            }
        }
    }

    /// Persists `branch` as the working branch.
    pub async fn select(&self, branch: Branch) -> Result<()> {
        tracing::info!("[BranchDirectory] Selected branch '{}'", branch.code);
        self.state.write().await.selected = Some(branch.clone());
        save_json(
            self.store.as_ref(),
            BRANCH_STORAGE_KEY,
            &PersistedBranch {
                selected_branch: Some(branch),
            },
        )
        .await
    }

    /// Finds a loaded branch by its trimmed code.
    pub async fn find(&self, code: &str) -> Option<Branch> {
        let code = code.trim();
        self.state
            .read()
            .await
            .pages
            .items
            .iter()
            .find(|b| b.code == code)
            .cloned()
    }

    /// Drops the list and the selection.
    pub async fn clear(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.pages.clear();
            state.selected = None;
        }
        self.store.remove(BRANCH_STORAGE_KEY).await
    }

    pub async fn branches(&self) -> Vec<Branch> {
        self.state.read().await.pages.items.clone()
    }

    pub async fn selected(&self) -> Option<Branch> {
        self.state.read().await.selected.clone()
    }

    pub async fn has_next(&self) -> bool {
        self.state.read().await.pages.has_next
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.pages.error.clone()
    }

    pub async fn is_hydrated(&self) -> bool {
        self.state.read().await.hydrated
    }
}
