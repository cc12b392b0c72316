//! Batch approval: planning per-type payloads and submitting them.

mod engine;
mod planner;

pub use engine::{BatchApprovalEngine, BatchReport};
pub use planner::{TypeBatch, plan_batches};
