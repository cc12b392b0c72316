//! Wiring of every service around the shared token and profile cells.

use std::sync::Arc;

use aprov_core::config::AppConfig;
use aprov_core::connection::ActiveProfile;
use aprov_core::error::Result;
use aprov_core::session::{BiometricAuthenticator, TokenSlot};
use aprov_core::storage::KeyValueStore;
use aprov_infrastructure::{AprovPaths, ConfigService, JsonFileStore};
use aprov_interaction::{ProtheusClient, RestProbe};

use crate::approval::BatchApprovalEngine;
use crate::branch_directory::BranchDirectory;
use crate::connection::ConnectionResolver;
use crate::feed::{DocumentDetailFeed, DocumentFeed};
use crate::module_catalog::ModuleCatalog;
use crate::selection::SelectionSet;
use crate::session::SessionManager;

/// All client services, sharing one REST client, one token slot and one
/// active profile.
pub struct AprovApp {
    pub config: AppConfig,
    pub resolver: ConnectionResolver,
    pub session: SessionManager,
    pub selection: SelectionSet,
    pub feed: Arc<DocumentFeed>,
    pub engine: BatchApprovalEngine,
    pub detail: DocumentDetailFeed,
    pub branches: BranchDirectory,
    pub modules: ModuleCatalog,
}

impl AprovApp {
    pub fn new(
        config: AppConfig,
        store: Arc<dyn KeyValueStore>,
        biometric: Arc<dyn BiometricAuthenticator>,
    ) -> Self {
        let active = ActiveProfile::new();
        let token = TokenSlot::new();
        let client = Arc::new(ProtheusClient::new(active.clone(), token.clone()));

        let selection = SelectionSet::new();
        let feed = Arc::new(DocumentFeed::new(client.clone(), selection.clone()));

        Self {
            resolver: ConnectionResolver::new(
                Arc::new(RestProbe::new()),
                store.clone(),
                active,
                config.http.clone(),
            ),
            session: SessionManager::new(client.clone(), biometric, store.clone(), token),
            engine: BatchApprovalEngine::new(client.clone(), selection.clone(), feed.clone()),
            detail: DocumentDetailFeed::new(
                client.clone(),
                config.paging.items_page_size,
                config.paging.item_history_page_size,
            ),
            branches: BranchDirectory::new(client, store.clone()),
            modules: ModuleCatalog::new(store),
            selection,
            feed,
            config,
        }
    }

    /// Loads `config.toml` and opens the state file under `paths`.
    pub fn open(paths: AprovPaths, biometric: Arc<dyn BiometricAuthenticator>) -> Result<Self> {
        let config = ConfigService::new(paths.clone()).get_config()?;
        let store = Arc::new(JsonFileStore::new(
            paths.state_file(&config.storage.state_file)?,
        ));
        Ok(Self::new(config, store, biometric))
    }

    /// Restores every persisted store. Must run before the first request.
    pub async fn hydrate(&self) -> Result<()> {
        self.resolver.hydrate().await?;
        self.session.hydrate().await?;
        self.branches.hydrate().await?;
        self.modules.hydrate().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBiometric;
    use aprov_core::connection::{ConnectionProfile, Protocol};
    use aprov_core::storage::{CONNECTION_STORAGE_KEY, save_json};
    use aprov_infrastructure::MemoryStore;

    #[tokio::test]
    async fn test_hydrate_restores_connection() {
        let store = Arc::new(MemoryStore::new());
        save_json(
            store.as_ref(),
            CONNECTION_STORAGE_KEY,
            &crate::connection::PersistedConnection {
                config: Some(ConnectionProfile::new(
                    Protocol::Https,
                    "erp.example.com",
                    None,
                    "rest",
                )),
                is_valid: true,
            },
        )
        .await
        .unwrap();

        let app = AprovApp::new(
            AppConfig::default(),
            store,
            Arc::new(MockBiometric::without_hardware()),
        );
        app.hydrate().await.unwrap();

        assert!(app.resolver.is_valid().await);
        assert_eq!(
            app.resolver.active().url_for("x").unwrap(),
            "https://erp.example.com/rest/x"
        );
        assert!(!app.session.is_authenticated().await);
        assert!(app.branches.is_hydrated().await);
        assert!(app.modules.is_hydrated().await);
    }

    #[test]
    fn test_open_uses_configured_state_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let app = AprovApp::open(
            AprovPaths::new(Some(temp_dir.path().to_path_buf())),
            Arc::new(MockBiometric::without_hardware()),
        )
        .unwrap();
        assert_eq!(app.config.paging.items_page_size, 10);
        assert!(temp_dir.path().join("config.toml").exists());
    }
}
