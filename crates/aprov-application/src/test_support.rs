//! Hand-written mocks of the core ports, shared by the service tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use aprov_core::approval::BatchApprovalPayload;
use aprov_core::branch::{Branch, BranchApi};
use aprov_core::connection::{ConnectionProbe, ConnectionProfile, ProbeResult};
use aprov_core::document::{
    ApportionmentQuery, ApprovalsApi, Document, DocumentApi, DocumentItem, DocumentItemsResponse,
    FilterSet,
};
use aprov_core::error::{AprovError, Result};
use aprov_core::paging::Page;
use aprov_core::session::{AuthApi, BiometricAuthenticator, BiometricKind, TokenResponse};

pub fn doc(scr_id: i64, document_type: &str, branch: &str) -> Document {
    Document {
        scr_id,
        document_branch: branch.to_string(),
        document_number: format!("{:06}", scr_id),
        document_type: document_type.to_string(),
        document_status: "02".to_string(),
        ..Default::default()
    }
}

pub fn token(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(String::from),
        expires_in: Some(3600),
        token_type: Some("bearer".into()),
        scope: None,
        has_mfa: None,
        name: None,
    }
}

/// Scripted approvals API. Pages and batch results are consumed in order;
/// every call is recorded.
#[derive(Default)]
pub struct MockApprovalsApi {
    pub pages: Mutex<VecDeque<Result<Page<Document>>>>,
    pub list_calls: Mutex<Vec<(FilterSet, u32)>>,
    pub batch_results: Mutex<VecDeque<Result<()>>>,
    pub batch_calls: Mutex<Vec<(String, BatchApprovalPayload)>>,
    pub delay: Option<Duration>,
}

impl MockApprovalsApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_page(&self, documents: Vec<Document>, has_next: bool) {
        self.pages
            .lock()
            .unwrap()
            .push_back(Ok(Page::new(documents, has_next)));
    }

    pub fn push_page_error(&self, error: AprovError) {
        self.pages.lock().unwrap().push_back(Err(error));
    }

    pub fn push_batch_result(&self, result: Result<()>) {
        self.batch_results.lock().unwrap().push_back(result);
    }

    pub fn list_calls(&self) -> Vec<(FilterSet, u32)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn batch_calls(&self) -> Vec<(String, BatchApprovalPayload)> {
        self.batch_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApprovalsApi for MockApprovalsApi {
    async fn list_documents(&self, filters: &FilterSet, page: u32) -> Result<Page<Document>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((filters.clone(), page));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::empty()))
    }

    async fn batch_approve(
        &self,
        document_type: &str,
        payload: &BatchApprovalPayload,
    ) -> Result<()> {
        self.batch_calls
            .lock()
            .unwrap()
            .push((document_type.to_string(), payload.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.batch_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

/// Item endpoint mock keyed by call order.
#[derive(Default)]
pub struct MockDocumentApi {
    pub responses: Mutex<VecDeque<Result<DocumentItemsResponse>>>,
    pub item_calls: Mutex<Vec<(String, i64, u32, u32, String)>>,
    pub history_calls: Mutex<Vec<String>>,
    pub apportionment_pages: Mutex<VecDeque<Result<Page<Value>>>>,
    pub apportionment_calls: Mutex<Vec<(ApportionmentQuery, u32, u32)>>,
}

impl MockDocumentApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_records(&self, products: &[&str], has_next: bool) {
        let items = products
            .iter()
            .map(|p| DocumentItem {
                product: Some(p.to_string()),
                ..Default::default()
            })
            .collect();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(DocumentItemsResponse {
                purchase_order_items: None,
                records: Some(items),
                has_next: Some(has_next),
            }));
    }

    pub fn push_purchase_order_items(&self, products: &[&str], has_next: bool) {
        let items = products
            .iter()
            .map(|p| DocumentItem {
                product: Some(p.to_string()),
                ..Default::default()
            })
            .collect();
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(DocumentItemsResponse {
                purchase_order_items: Some(items),
                records: None,
                has_next: Some(has_next),
            }));
    }

    pub fn push_error(&self, error: AprovError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn item_calls(&self) -> Vec<(String, i64, u32, u32, String)> {
        self.item_calls.lock().unwrap().clone()
    }

    /// Queues one generic-query page whose rows carry the given cost centers.
    pub fn push_apportionment(&self, cost_centers: &[&str], has_next: bool) {
        let rows = cost_centers.iter().map(|cc| json!({"cx_cc": cc})).collect();
        self.apportionment_pages
            .lock()
            .unwrap()
            .push_back(Ok(Page::new(rows, has_next)));
    }

    pub fn push_apportionment_error(&self, error: AprovError) {
        self.apportionment_pages.lock().unwrap().push_back(Err(error));
    }

    pub fn apportionment_calls(&self) -> Vec<(ApportionmentQuery, u32, u32)> {
        self.apportionment_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentApi for MockDocumentApi {
    async fn document_items(
        &self,
        endpoint: &str,
        scr_id: i64,
        page: u32,
        page_size: u32,
        item_group: &str,
    ) -> Result<DocumentItemsResponse> {
        self.item_calls.lock().unwrap().push((
            endpoint.to_string(),
            scr_id,
            page,
            page_size,
            item_group.to_string(),
        ));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DocumentItemsResponse::default()))
    }

    async fn approval_history(&self, document_number: &str) -> Result<Value> {
        self.history_calls
            .lock()
            .unwrap()
            .push(document_number.to_string());
        Ok(json!({"history": [{"document": document_number}]}))
    }

    async fn item_history(&self, product_code: &str, page: u32, page_size: u32) -> Result<Value> {
        Ok(json!({"productCode": product_code, "page": page, "pageSize": page_size}))
    }

    async fn item_additional_info(
        &self,
        record_number: &str,
        item_number: &str,
        item_recno: i64,
    ) -> Result<Value> {
        Ok(json!({
            "recordNumber": record_number,
            "itemNumber": item_number,
            "itemRecno": item_recno
        }))
    }

    async fn attachments(&self, scr_id: i64, page: u32, page_size: u32) -> Result<Value> {
        Ok(json!({"scrId": scr_id, "page": page, "pageSize": page_size}))
    }

    async fn apportionment(
        &self,
        query: &ApportionmentQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Value>> {
        self.apportionment_calls
            .lock()
            .unwrap()
            .push((query.clone(), page, page_size));
        self.apportionment_pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::empty()))
    }
}

#[derive(Default)]
pub struct MockBranchApi {
    pub pages: Mutex<VecDeque<Result<Page<Branch>>>>,
    pub calls: Mutex<Vec<u32>>,
}

impl MockBranchApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_page(&self, codes: &[&str], has_next: bool) {
        let branches = codes
            .iter()
            .map(|code| Branch {
                code: code.to_string(),
                description: format!("Branch {}", code),
                ..Default::default()
            })
            .collect();
        self.pages
            .lock()
            .unwrap()
            .push_back(Ok(Page::new(branches, has_next)));
    }

    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BranchApi for MockBranchApi {
    async fn list_branches(&self, page: u32) -> Result<Page<Branch>> {
        self.calls.lock().unwrap().push(page);
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Page::empty()))
    }
}

/// Auth mock with scripted login and refresh answers.
#[derive(Default)]
pub struct MockAuthApi {
    pub login_results: Mutex<VecDeque<Result<TokenResponse>>>,
    pub refresh_results: Mutex<VecDeque<Result<TokenResponse>>>,
    pub refresh_calls: Mutex<Vec<String>>,
}

impl MockAuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_login(&self, result: Result<TokenResponse>) {
        self.login_results.lock().unwrap().push_back(result);
    }

    pub fn push_refresh(&self, result: Result<TokenResponse>) {
        self.refresh_results.lock().unwrap().push_back(result);
    }

    pub fn refresh_calls(&self) -> Vec<String> {
        self.refresh_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, _username: &str, _password: &str) -> Result<TokenResponse> {
        self.login_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AprovError::authentication("no scripted login")))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.refresh_calls
            .lock()
            .unwrap()
            .push(refresh_token.to_string());
        self.refresh_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AprovError::authentication("no scripted refresh")))
    }
}

/// Device biometric mock.
pub struct MockBiometric {
    pub hardware: bool,
    pub enrolled: bool,
    pub kinds: Vec<BiometricKind>,
    pub passes: Mutex<bool>,
    pub prompts: Mutex<u32>,
}

impl MockBiometric {
    pub fn available(kinds: Vec<BiometricKind>) -> Self {
        Self {
            hardware: true,
            enrolled: true,
            kinds,
            passes: Mutex::new(true),
            prompts: Mutex::new(0),
        }
    }

    pub fn without_hardware() -> Self {
        Self {
            hardware: false,
            enrolled: false,
            kinds: Vec::new(),
            passes: Mutex::new(false),
            prompts: Mutex::new(0),
        }
    }

    pub fn not_enrolled() -> Self {
        Self {
            enrolled: false,
            ..Self::available(vec![BiometricKind::Fingerprint])
        }
    }

    pub fn set_passes(&self, passes: bool) {
        *self.passes.lock().unwrap() = passes;
    }

    pub fn prompt_count(&self) -> u32 {
        *self.prompts.lock().unwrap()
    }
}

#[async_trait]
impl BiometricAuthenticator for MockBiometric {
    async fn has_hardware(&self) -> bool {
        self.hardware
    }

    async fn is_enrolled(&self) -> bool {
        self.enrolled
    }

    async fn supported_kinds(&self) -> Vec<BiometricKind> {
        self.kinds.clone()
    }

    async fn authenticate(&self, _prompt: &str) -> bool {
        *self.prompts.lock().unwrap() += 1;
        *self.passes.lock().unwrap()
    }
}

/// Probe mock answering by base URL; unknown URLs fail with a transport error.
#[derive(Default)]
pub struct MockProbe {
    pub reachable: Mutex<Vec<String>>,
    pub probed: Mutex<Vec<String>>,
}

impl MockProbe {
    pub fn reachable(base_urls: &[&str]) -> Self {
        Self {
            reachable: Mutex::new(base_urls.iter().map(|u| u.to_string()).collect()),
            probed: Mutex::new(Vec::new()),
        }
    }

    pub fn probed(&self) -> Vec<String> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConnectionProbe for MockProbe {
    async fn probe(&self, profile: &ConnectionProfile, _timeout: Duration) -> ProbeResult {
        let base = profile.base_url();
        self.probed.lock().unwrap().push(base.clone());
        if self.reachable.lock().unwrap().contains(&base) {
            ProbeResult {
                success: true,
                url: Some(base),
                status_code: Some(401),
                error: None,
                timed_out: false,
            }
        } else {
            ProbeResult::failure(Some(base), "Connection refused")
        }
    }
}
