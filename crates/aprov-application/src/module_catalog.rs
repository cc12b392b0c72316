//! Back-office module list and the persisted module choice.

use std::sync::Arc;
use tokio::sync::RwLock;

use serde::{Deserialize, Serialize};

use aprov_core::error::{AprovError, Result};
use aprov_core::module::{ModuleItem, default_modules};
use aprov_core::storage::{KeyValueStore, MODULE_STORAGE_KEY, load_json, save_json};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedModule {
    pub selected_module: Option<ModuleItem>,
}

#[derive(Default)]
struct CatalogState {
    selected: Option<ModuleItem>,
    hydrated: bool,
}

pub struct ModuleCatalog {
    modules: Vec<ModuleItem>,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<CatalogState>,
}

impl ModuleCatalog {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            modules: default_modules(),
            store,
            state: RwLock::new(CatalogState::default()),
        }
    }

    pub async fn hydrate(&self) -> Result<()> {
        let persisted: PersistedModule = load_json(self.store.as_ref(), MODULE_STORAGE_KEY)
            .await?
            .unwrap_or_default();
        let mut state = self.state.write().await;
        state.selected = persisted.selected_module;
        state.hydrated = true;
        Ok(())
    }

    pub fn modules(&self) -> &[ModuleItem] {
        &self.modules
    }

    /// Selects a module by id and persists the choice.
    pub async fn select(&self, id: &str) -> Result<ModuleItem> {
        let module = self
            .modules
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| AprovError::not_found("Module", id))?;

        self.state.write().await.selected = Some(module.clone());
        save_json(
            self.store.as_ref(),
            MODULE_STORAGE_KEY,
            &PersistedModule {
                selected_module: Some(module.clone()),
            },
        )
        .await?;
        Ok(module)
    }

    pub async fn clear(&self) -> Result<()> {
        self.state.write().await.selected = None;
        self.store.remove(MODULE_STORAGE_KEY).await
    }

    pub async fn selected(&self) -> Option<ModuleItem> {
        self.state.read().await.selected.clone()
    }

    pub async fn is_hydrated(&self) -> bool {
        self.state.read().await.hydrated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aprov_infrastructure::MemoryStore;

    #[tokio::test]
    async fn test_select_and_restore() {
        let store = Arc::new(MemoryStore::new());
        let catalog = ModuleCatalog::new(store.clone());
        assert_eq!(catalog.modules().len(), 5);

        let module = catalog.select("purchasing").await.unwrap();
        assert_eq!(module.route, "/(tabs)/purchasing");

        let restored = ModuleCatalog::new(store);
        restored.hydrate().await.unwrap();
        assert_eq!(restored.selected().await, Some(module));
    }

    #[tokio::test]
    async fn test_unknown_module() {
        let catalog = ModuleCatalog::new(Arc::new(MemoryStore::new()));
        let err = catalog.select("payroll").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(catalog.selected().await.is_none());
    }
}
