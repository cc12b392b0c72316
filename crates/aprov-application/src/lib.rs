//! Application layer: the stateful services of the approvals client.
//!
//! Every service reads the REST surface through the core ports, so tests
//! drive them with in-memory mocks and the CLI wires them through
//! [`AprovApp`].

pub mod app;
pub mod approval;
pub mod branch_directory;
pub mod connection;
pub mod feed;
pub mod module_catalog;
pub mod selection;
pub mod session;

#[cfg(test)]
mod test_support;

pub use app::AprovApp;
pub use approval::{BatchApprovalEngine, BatchReport, TypeBatch, plan_batches};
pub use branch_directory::BranchDirectory;
pub use connection::{ConnectionResolver, ResolvedProbe};
pub use feed::{DetailKey, DocumentDetailFeed, DocumentFeed, FetchOutcome};
pub use module_catalog::ModuleCatalog;
pub use selection::SelectionSet;
pub use session::{AutoLoginOutcome, SessionManager};
