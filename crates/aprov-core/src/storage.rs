//! Key-value persistence port.
//!
//! Stateful services keep their durable state (session, connection profile,
//! selections) behind this trait so they survive process restarts.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::Result;

/// Storage key of the persisted session.
pub const AUTH_STORAGE_KEY: &str = "auth-storage";
/// Storage key of the active connection profile.
pub const CONNECTION_STORAGE_KEY: &str = "connection-storage";
/// Storage key of the selected branch.
pub const BRANCH_STORAGE_KEY: &str = "branch-storage";
/// Storage key of the selected module.
pub const MODULE_STORAGE_KEY: &str = "module-storage";

/// String values by key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and deserializes a JSON value stored under `key`.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serializes `value` to JSON and stores it under `key`.
pub async fn save_json<T: Serialize + Sync>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, raw).await
}
