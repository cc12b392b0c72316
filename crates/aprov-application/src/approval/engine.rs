use std::sync::Arc;

use aprov_core::approval::ApprovalAction;
use aprov_core::document::{ApprovalsApi, Document};
use aprov_core::error::{AprovError, Result};

use super::planner::plan_batches;
use crate::feed::{ActiveCount, DocumentFeed};
use crate::selection::SelectionSet;

/// What a successful batch did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchReport {
    /// Type codes submitted, in call order
    pub submitted_types: Vec<String>,
    pub document_count: usize,
    /// Whether the feed was reloaded afterwards
    pub feed_refreshed: bool,
}

/// Submits approve/reject decisions, one call per document type.
///
/// The caller must validate the decision first (see
/// [`aprov_core::approval::validate_decision`]): a rejection needs a
/// non-blank justification, and the engine does not check it.
///
/// Calls run sequentially in first-seen type order. If one fails, the
/// remaining types are not sent and types already accepted by the server
/// stay applied; that case is reported as [`AprovError::PartialBatch`].
/// The engine does not guard against duplicate submission; callers should
/// check [`BatchApprovalEngine::is_processing`] before triggering it.
pub struct BatchApprovalEngine {
    api: Arc<dyn ApprovalsApi>,
    selection: SelectionSet,
    feed: Arc<DocumentFeed>,
    processing: ActiveCount,
}

impl BatchApprovalEngine {
    pub fn new(api: Arc<dyn ApprovalsApi>, selection: SelectionSet, feed: Arc<DocumentFeed>) -> Self {
        Self {
            api,
            selection,
            feed,
            processing: ActiveCount::default(),
        }
    }

    /// True while any batch is being submitted, overlapping calls included.
    pub fn is_processing(&self) -> bool {
        self.processing.is_active()
    }

    /// Decides every document in the current selection.
    pub async fn process_selection(
        &self,
        action: ApprovalAction,
        justification: &str,
    ) -> Result<BatchReport> {
        let documents = self.selection.snapshot().await;
        self.process(action, justification, &documents).await
    }

    /// Decides `documents`. An empty list succeeds without any call.
    ///
    /// On success every processed document leaves the selection and the
    /// feed is reloaded with its last filters. A failed reload does not
    /// fail the batch; it is recorded on the feed.
    pub async fn process(
        &self,
        action: ApprovalAction,
        justification: &str,
        documents: &[Document],
    ) -> Result<BatchReport> {
        let batches = plan_batches(action, justification, documents);
        if batches.is_empty() {
            tracing::debug!("[BatchApprovalEngine] Nothing to submit");
            return Ok(BatchReport::default());
        }

        let _processing = self.processing.enter();

        let mut report = BatchReport::default();
        for batch in &batches {
            tracing::info!(
                "[BatchApprovalEngine] {} {} document(s) of type {} across {} branch(es)",
                action,
                batch.payload.document_count(),
                batch.document_type,
                batch.payload.approvals.len()
            );

            if let Err(e) = self
                .api
                .batch_approve(&batch.document_type, &batch.payload)
                .await
            {
                tracing::error!(
                    "[BatchApprovalEngine] Type {} failed after {:?}: {}",
                    batch.document_type,
                    report.submitted_types,
                    e
                );
                if report.submitted_types.is_empty() {
                    return Err(e);
                }
                return Err(AprovError::PartialBatch {
                    completed: report.submitted_types,
                    failed_type: batch.document_type.clone(),
                    message: e.to_string(),
                });
            }

            report.document_count += batch.payload.document_count();
            report.submitted_types.push(batch.document_type.clone());
        }

        for document in documents {
            self.selection.deselect(document.scr_id).await;
        }

        report.feed_refreshed = match self.feed.refresh().await {
            Some(Ok(outcome)) => outcome.is_loaded(),
            Some(Err(e)) => {
                tracing::warn!("[BatchApprovalEngine] Feed refresh after batch failed: {}", e);
                false
            }
            None => false,
        };

        Ok(report)
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
