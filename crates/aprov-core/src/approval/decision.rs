use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{AprovError, Result};

/// What the user decided for the selected documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl ApprovalAction {
    pub fn to_approve(&self) -> bool {
        matches!(self, Self::Approve)
    }
}

/// Checks a decision before it is handed to the batch engine.
///
/// A rejection needs a non-blank justification; the server does not reliably
/// refuse one without it. Returns the trimmed justification to submit.
pub fn validate_decision(action: ApprovalAction, justification: &str) -> Result<String> {
    let trimmed = justification.trim();
    if action == ApprovalAction::Reject && trimmed.is_empty() {
        return Err(AprovError::validation(
            "A justification is required to reject documents",
        ));
    }
    Ok(trimmed.to_string())
}
