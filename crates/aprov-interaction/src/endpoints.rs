//! REST paths, relative to the active profile's base URL.

pub const TOKEN: &str = "api/oauth2/v1/token";
pub const BRANCHES: &str = "api/framework/environment/v1/branches";
pub const GENERIC_QUERY: &str = "api/framework/v1/genericQuery";

pub const APPROVALS_BASE: &str = "backofficeapprovals/api/com/approvals/v1";

pub fn approvals_list() -> String {
    format!("{}/approvalsList", APPROVALS_BASE)
}

/// `document_type` is sent upper-cased and trimmed.
pub fn batch_approvals(document_type: &str) -> String {
    format!(
        "{}/batchApprovals/{}",
        APPROVALS_BASE,
        document_type.trim().to_uppercase()
    )
}

pub fn document_items(endpoint: &str, scr_id: i64) -> String {
    format!("{}/{}/{}/items", APPROVALS_BASE, endpoint, scr_id)
}

pub fn approval_history(document_number: &str) -> String {
    format!("{}/getHistByDoc/{}", APPROVALS_BASE, document_number.trim())
}

pub fn item_history() -> String {
    format!("{}/historybyitem", APPROVALS_BASE)
}

pub fn item_additional_info() -> String {
    format!("{}/itemAdditionalInformation", APPROVALS_BASE)
}

pub fn list_attachments(scr_id: i64) -> String {
    format!("{}/listAttachments/{}", APPROVALS_BASE, scr_id)
}
