use serde::{Deserialize, Serialize};

/// Body of `PUT .../batchApprovals/{type}`: one entry per branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchApprovalPayload {
    pub approvals: Vec<BranchApproval>,
}

impl BatchApprovalPayload {
    /// Total number of documents across every branch entry.
    pub fn document_count(&self) -> usize {
        self.approvals.iter().map(|a| a.documents.len()).sum()
    }
}

/// Decisions for the documents of one branch. `branch` is sent verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchApproval {
    pub branch: String,
    pub documents: Vec<ApprovalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalEntry {
    /// The document number
    pub document_id: String,
    pub item_group: String,
    pub justification: String,
    pub to_approve: bool,
    pub scr_id: i64,
}
