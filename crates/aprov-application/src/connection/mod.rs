//! Connection profile resolution.

mod resolver;

pub use resolver::{ConnectionResolver, PersistedConnection, ResolvedProbe};
