use serde::{Deserialize, Serialize};

use super::model::DocumentStatus;

/// Query parameters that scope one document page sequence.
///
/// Every load-more must reuse the filter set that produced the current pages.
/// Changing any field means starting over from page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    /// `None` lists every type
    pub document_type: Option<String>,
    pub document_status: String,
    pub branches: Vec<String>,
    pub init_date: Option<String>,
    pub end_date: Option<String>,
    pub search_key: Option<String>,
}

impl FilterSet {
    pub fn new(document_type: Option<String>, status: DocumentStatus) -> Self {
        Self {
            document_type,
            document_status: status.code().to_string(),
            branches: Vec::new(),
            init_date: None,
            end_date: None,
            search_key: None,
        }
    }

    pub fn with_branches(mut self, branches: Vec<String>) -> Self {
        self.branches = branches;
        self
    }

    pub fn with_dates(mut self, init_date: Option<String>, end_date: Option<String>) -> Self {
        self.init_date = init_date;
        self.end_date = end_date;
        self
    }

    pub fn with_search_key(mut self, search_key: Option<String>) -> Self {
        self.search_key = search_key;
        self
    }

    /// Branches as the single comma-joined field the server expects.
    pub fn branch_param(&self) -> Option<String> {
        if self.branches.is_empty() {
            None
        } else {
            Some(self.branches.join(","))
        }
    }

    /// Query pairs for the approvals list endpoint. Empty optional fields are omitted.
    pub fn to_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", page.to_string())];

        if let Some(kind) = non_empty(&self.document_type) {
            query.push(("documentType", kind.to_string()));
        }
        query.push(("documentStatus", self.document_status.clone()));
        if let Some(date) = non_empty(&self.init_date) {
            query.push(("initDate", date.to_string()));
        }
        if let Some(date) = non_empty(&self.end_date) {
            query.push(("endDate", date.to_string()));
        }
        if let Some(key) = non_empty(&self.search_key) {
            query.push(("searchkey", key.to_string()));
        }
        if let Some(branches) = self.branch_param() {
            query.push(("documentBranch", branches));
        }

        query
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        Self::new(None, DocumentStatus::Pending)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
