//! Documents picked by the user for a batch decision.

use std::sync::Arc;
use tokio::sync::RwLock;

use aprov_core::document::Document;

/// Set of selected documents, unique by `scr_id`.
///
/// Clones share the same set, so the feed, the engine and the caller all
/// observe one selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the document if absent, removes it if present.
    ///
    /// Returns whether the document is selected afterwards.
    pub async fn toggle(&self, document: &Document) -> bool {
        let mut documents = self.documents.write().await;
        if let Some(index) = documents.iter().position(|d| d.scr_id == document.scr_id) {
            documents.remove(index);
            false
        } else {
            documents.push(document.clone());
            true
        }
    }

    /// Removes the document if present; a no-op otherwise.
    pub async fn deselect(&self, scr_id: i64) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|d| d.scr_id != scr_id);
        documents.len() != before
    }

    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    /// Drops every selection the predicate rejects.
    pub async fn retain<F>(&self, mut keep: F)
    where
        F: FnMut(&Document) -> bool,
    {
        self.documents.write().await.retain(|d| keep(d));
    }

    pub async fn contains(&self, scr_id: i64) -> bool {
        self.documents.read().await.iter().any(|d| d.scr_id == scr_id)
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Copy of the selection in insertion order.
    pub async fn snapshot(&self) -> Vec<Document> {
        self.documents.read().await.clone()
    }
}
