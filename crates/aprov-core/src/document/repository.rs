//! REST ports for the approvals API.

use async_trait::async_trait;
use serde_json::Value;

use super::apportionment::ApportionmentQuery;
use super::filter::FilterSet;
use super::item::DocumentItemsResponse;
use super::model::Document;
use crate::approval::BatchApprovalPayload;
use crate::error::Result;
use crate::paging::Page;

/// Listing and deciding on documents pending approval.
#[async_trait]
pub trait ApprovalsApi: Send + Sync {
    /// Fetches one page of documents for the given filters.
    ///
    /// An absent or empty `documents` field yields an empty page, not an error.
    async fn list_documents(&self, filters: &FilterSet, page: u32) -> Result<Page<Document>>;

    /// Submits every decision for one document type in a single call.
    ///
    /// `document_type` is the grouping key (already trimmed and upper-cased).
    async fn batch_approve(&self, document_type: &str, payload: &BatchApprovalPayload)
    -> Result<()>;
}

/// Per-document detail endpoints.
#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Fetches one page of line items from `{endpoint}/{scr_id}/items`.
    async fn document_items(
        &self,
        endpoint: &str,
        scr_id: i64,
        page: u32,
        page_size: u32,
        item_group: &str,
    ) -> Result<DocumentItemsResponse>;

    /// Approval history of a document, passed through untouched.
    async fn approval_history(&self, document_number: &str) -> Result<Value>;

    /// Purchase history of a product, passed through untouched.
    async fn item_history(&self, product_code: &str, page: u32, page_size: u32) -> Result<Value>;

    /// Additional information fields of one line item, passed through untouched.
    async fn item_additional_info(
        &self,
        record_number: &str,
        item_number: &str,
        item_recno: i64,
    ) -> Result<Value>;

    /// One page of attachment metadata for a document. Listing only.
    async fn attachments(&self, scr_id: i64, page: u32, page_size: u32) -> Result<Value>;

    /// One page of apportionment rows. Rows keep the server's column names.
    async fn apportionment(
        &self,
        query: &ApportionmentQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Value>>;
}
