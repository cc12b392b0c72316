//! Grouping of selected documents into per-type batch payloads.

use std::collections::HashSet;

use aprov_core::approval::{ApprovalAction, ApprovalEntry, BatchApprovalPayload, BranchApproval};
use aprov_core::document::Document;

/// One network call worth of decisions: every document of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeBatch {
    /// Trimmed, upper-cased type code
    pub document_type: String,
    pub payload: BatchApprovalPayload,
}

/// Partitions `documents` by type, then by branch.
///
/// Types compare case-insensitively after trimming; branches compare
/// verbatim and are sent as-is, padding included. Groups keep first-seen
/// order. A document listed twice (same `scr_id`) is planned once.
pub fn plan_batches(
    action: ApprovalAction,
    justification: &str,
    documents: &[Document],
) -> Vec<TypeBatch> {
    let mut seen = HashSet::new();
    let mut batches: Vec<TypeBatch> = Vec::new();

    for document in documents {
        if !seen.insert(document.scr_id) {
            continue;
        }

        let type_key = document.type_key();
        let batch_index = match batches.iter().position(|b| b.document_type == type_key) {
            Some(index) => index,
            None => {
                batches.push(TypeBatch {
                    document_type: type_key,
                    payload: BatchApprovalPayload::default(),
                });
                batches.len() - 1
            }
        };
        let approvals = &mut batches[batch_index].payload.approvals;

        let branch_index = match approvals
            .iter()
            .position(|a| a.branch == document.document_branch)
        {
            Some(index) => index,
            None => {
                approvals.push(BranchApproval {
                    branch: document.document_branch.clone(),
                    documents: Vec::new(),
                });
                approvals.len() - 1
            }
        };

        approvals[branch_index].documents.push(ApprovalEntry {
            document_id: document.document_number.clone(),
            item_group: document.document_item_group.clone(),
            justification: justification.to_string(),
            to_approve: action.to_approve(),
            scr_id: document.scr_id,
        });
    }

    batches
}
