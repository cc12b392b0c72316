//! Branch (filial) domain module.

mod model;
mod repository;

pub use model::Branch;
pub use repository::BranchApi;
