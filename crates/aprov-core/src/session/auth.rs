use async_trait::async_trait;

use super::model::TokenResponse;
use crate::error::Result;

/// The Protheus OAuth2 token endpoint.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `grant_type=password`, credentials travel in headers.
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse>;

    /// `grant_type=refresh_token`.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse>;
}
