use std::sync::{Arc, PoisonError, RwLock};

use super::profile::ConnectionProfile;
use crate::error::{AprovError, Result};

/// The process-wide active connection profile.
///
/// Cloning shares the same slot. Outbound calls read it at dispatch time, so
/// activating a new profile affects the very next request.
#[derive(Debug, Clone, Default)]
pub struct ActiveProfile {
    inner: Arc<RwLock<Option<ConnectionProfile>>>,
}

impl ActiveProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ConnectionProfile> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, profile: ConnectionProfile) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(profile);
    }

    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Resolves `path` against the active profile.
    pub fn url_for(&self, path: &str) -> Result<String> {
        self.get()
            .map(|profile| profile.url_for(path))
            .ok_or(AprovError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Protocol;

    #[test]
    fn test_clones_share_the_slot() {
        let active = ActiveProfile::new();
        let reader = active.clone();
        assert_eq!(reader.url_for("x"), Err(AprovError::NotConnected));

        active.set(ConnectionProfile::new(Protocol::Http, "localhost", None, "rest"));
        assert_eq!(reader.url_for("x").unwrap(), "http://localhost/rest/x");

        active.clear();
        assert!(reader.get().is_none());
    }

    #[test]
    fn test_poisoned_slot_keeps_working() {
        let active = ActiveProfile::new();
        active.set(ConnectionProfile::new(Protocol::Http, "erp.local", None, "rest"));

        let inner = active.inner.clone();
        let _ = std::thread::spawn(move || {
            let _guard = inner.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(active.inner.is_poisoned());

        assert_eq!(active.url_for("x").unwrap(), "http://erp.local/rest/x");
        active.clear();
        assert_eq!(active.url_for("x"), Err(AprovError::NotConnected));
        active.set(ConnectionProfile::new(Protocol::Https, "erp.local", None, "rest"));
        assert!(active.get().is_some());
    }
}
