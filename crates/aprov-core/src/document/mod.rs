//! Document domain module.
//!
//! # Module Structure
//!
//! - `model`: the approval document and its type/status code sets
//! - `filter`: the filter set that scopes a document feed
//! - `item`: document line items and the item-list response normalization
//! - `apportionment`: generic-query builder for cost-center splits
//! - `repository`: REST ports for listing documents and their items

mod apportionment;
mod filter;
mod item;
mod model;
mod repository;

pub use apportionment::{ApportionmentQuery, ApportionmentSource};
pub use filter::FilterSet;
pub use item::{DocumentItem, DocumentItemsResponse};
pub use model::{Document, DocumentStatus, DocumentType};
pub use repository::{ApprovalsApi, DocumentApi};
