//! Approval decisions and the batch payload sent to the server.

mod decision;
mod payload;

pub use decision::{ApprovalAction, validate_decision};
pub use payload::{ApprovalEntry, BatchApprovalPayload, BranchApproval};
