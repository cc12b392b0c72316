//! ProtheusClient - REST implementation of every remote port.
//!
//! The client never caches a base URL: each request resolves its URL against
//! the shared [`ActiveProfile`] and attaches the bearer token currently held
//! in the shared [`TokenSlot`]. The session manager and connection resolver
//! update those cells, so a login or a profile switch is picked up by the
//! very next call.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use aprov_core::approval::BatchApprovalPayload;
use aprov_core::branch::{Branch, BranchApi};
use aprov_core::connection::ActiveProfile;
use aprov_core::document::{
    ApportionmentQuery, ApprovalsApi, Document, DocumentApi, DocumentItemsResponse, FilterSet,
};
use aprov_core::error::{AprovError, Result};
use aprov_core::paging::Page;
use aprov_core::session::{AuthApi, TokenResponse, TokenSlot};

use crate::endpoints;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DocumentListResponse {
    documents: Option<Vec<Document>>,
    has_next: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BranchListResponse {
    items: Option<Vec<Branch>>,
    has_next: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GenericQueryResponse {
    items: Option<Vec<Value>>,
    has_next: Option<bool>,
}

/// REST client for the Protheus approvals back office.
#[derive(Clone)]
pub struct ProtheusClient {
    http: Client,
    profile: ActiveProfile,
    token: TokenSlot,
}

impl ProtheusClient {
    pub fn new(profile: ActiveProfile, token: TokenSlot) -> Self {
        Self::with_http(Client::new(), profile, token)
    }

    pub fn with_http(http: Client, profile: ActiveProfile, token: TokenSlot) -> Self {
        Self {
            http,
            profile,
            token,
        }
    }

    /// Builds a request against the active profile, with the bearer token
    /// when one is set.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.profile.url_for(path)?;
        tracing::debug!("[ProtheusClient] {} {}", method, url);

        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token.get() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(AprovError::from)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("[ProtheusClient] HTTP {}: {}", status, error_text);
            return Err(AprovError::Http {
                status: status.as_u16(),
                message: error_text,
            });
        }

        Ok(response)
    }

    /// Decodes a JSON body; an empty body decodes as `T::default()`.
    async fn json_or_default<T>(response: Response) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let body = response.text().await.map_err(AprovError::from)?;
        if body.trim().is_empty() {
            return Ok(T::default());
        }
        Ok(serde_json::from_str(&body)?)
    }

    async fn token_request(&self, builder: RequestBuilder) -> Result<TokenResponse> {
        let response = Self::send(builder).await.map_err(|e| match e {
            AprovError::Http { status, message } if (400..500).contains(&status) => {
                AprovError::authentication(format!("HTTP {}: {}", status, message))
            }
            other => other,
        })?;

        response.json::<TokenResponse>().await.map_err(|e| {
            AprovError::authentication(format!("Failed to parse token response: {}", e))
        })
    }
}

#[async_trait]
impl AuthApi for ProtheusClient {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.profile.url_for(endpoints::TOKEN)?;
        tracing::info!("[ProtheusClient] Requesting password grant for '{}'", username);

        let builder = self
            .http
            .post(url)
            .query(&[("grant_type", "password")])
            .header("username", username)
            .header("password", password);

        self.token_request(builder).await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let url = self.profile.url_for(endpoints::TOKEN)?;
        tracing::debug!("[ProtheusClient] Requesting refresh grant");

        let builder = self.http.post(url).query(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]);

        self.token_request(builder).await
    }
}

#[async_trait]
impl ApprovalsApi for ProtheusClient {
    async fn list_documents(&self, filters: &FilterSet, page: u32) -> Result<Page<Document>> {
        let builder = self
            .request(Method::GET, &endpoints::approvals_list())?
            .query(&filters.to_query(page));

        let body: DocumentListResponse = Self::json_or_default(Self::send(builder).await?).await?;

        Ok(Page::new(
            body.documents.unwrap_or_default(),
            body.has_next.unwrap_or(false),
        ))
    }

    async fn batch_approve(
        &self,
        document_type: &str,
        payload: &BatchApprovalPayload,
    ) -> Result<()> {
        tracing::info!(
            "[ProtheusClient] Submitting {} {} document(s)",
            payload.document_count(),
            document_type.trim().to_uppercase()
        );

        let builder = self
            .request(Method::PUT, &endpoints::batch_approvals(document_type))?
            .json(payload);

        Self::send(builder).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentApi for ProtheusClient {
    async fn document_items(
        &self,
        endpoint: &str,
        scr_id: i64,
        page: u32,
        page_size: u32,
        item_group: &str,
    ) -> Result<DocumentItemsResponse> {
        let builder = self
            .request(Method::GET, &endpoints::document_items(endpoint, scr_id))?
            .query(&[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
                ("itemGroup", item_group.to_string()),
            ]);

        Self::json_or_default(Self::send(builder).await?).await
    }

    async fn approval_history(&self, document_number: &str) -> Result<Value> {
        let builder = self.request(Method::GET, &endpoints::approval_history(document_number))?;
        Self::json_or_default(Self::send(builder).await?).await
    }

    async fn item_history(&self, product_code: &str, page: u32, page_size: u32) -> Result<Value> {
        let builder = self
            .request(Method::GET, &endpoints::item_history())?
            .query(&[
                ("productCode", product_code.trim().to_string()),
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ]);

        Self::json_or_default(Self::send(builder).await?).await
    }

    async fn item_additional_info(
        &self,
        record_number: &str,
        item_number: &str,
        item_recno: i64,
    ) -> Result<Value> {
        let builder = self
            .request(Method::GET, &endpoints::item_additional_info())?
            .query(&[
                ("recordNumber", record_number.trim().to_string()),
                ("itemNumber", item_number.trim().to_string()),
                ("itemRecno", item_recno.to_string()),
            ]);

        Self::json_or_default(Self::send(builder).await?).await
    }

    async fn attachments(&self, scr_id: i64, page: u32, page_size: u32) -> Result<Value> {
        let builder = self
            .request(Method::GET, &endpoints::list_attachments(scr_id))?
            .query(&[
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ]);

        Self::json_or_default(Self::send(builder).await?).await
    }

    async fn apportionment(
        &self,
        query: &ApportionmentQuery,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Value>> {
        tracing::debug!(
            "[ProtheusClient] Querying apportionment of {} page {}",
            query.document_number,
            page
        );

        let builder = self
            .request(Method::GET, endpoints::GENERIC_QUERY)?
            .query(&query.to_query(page, page_size));

        let body: GenericQueryResponse = Self::json_or_default(Self::send(builder).await?).await?;

        Ok(Page::new(
            body.items.unwrap_or_default(),
            body.has_next.unwrap_or(false),
        ))
    }
}

#[async_trait]
impl BranchApi for ProtheusClient {
    async fn list_branches(&self, page: u32) -> Result<Page<Branch>> {
        let builder = self
            .request(Method::GET, endpoints::BRANCHES)?
            .query(&[("page", page.to_string())]);

        let body: BranchListResponse = Self::json_or_default(Self::send(builder).await?).await?;

        Ok(Page::new(
            body.items
                .unwrap_or_default()
                .into_iter()
                .map(Branch::normalized)
                .collect(),
            body.has_next.unwrap_or(false),
        ))
    }
}
