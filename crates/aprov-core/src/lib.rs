//! Domain layer for the APROV approvals client.
//!
//! Holds the models shared by every other crate (documents, filters, sessions,
//! connection profiles, branches), the shared error type, and the ports the
//! infrastructure and interaction layers implement.

pub mod approval;
pub mod branch;
pub mod config;
pub mod connection;
pub mod document;
pub mod error;
pub mod module;
pub mod paging;
pub mod serde_ext;
pub mod session;
pub mod storage;

// Re-export common error type
pub use error::AprovError;
