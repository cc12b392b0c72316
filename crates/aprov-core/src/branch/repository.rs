use async_trait::async_trait;

use super::model::Branch;
use crate::error::Result;
use crate::paging::Page;

#[async_trait]
pub trait BranchApi: Send + Sync {
    /// Lists one page of branches. Endpoints without paging ignore `page`.
    async fn list_branches(&self, page: u32) -> Result<Page<Branch>>;
}
