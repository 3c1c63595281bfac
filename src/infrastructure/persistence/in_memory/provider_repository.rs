//! # In-Memory Provider Repository
//!
//! In-memory implementation of [`ProviderRepository`].
//!
//! IDs are assigned from a counter kept under the same lock as the map so
//! concurrent creates never collide.

use crate::domain::entities::ProviderConfig;
use crate::domain::value_objects::ProviderId;
use crate::infrastructure::persistence::traits::{ProviderRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct ProviderTable {
    rows: HashMap<ProviderId, ProviderConfig>,
    last_id: i64,
}

/// In-memory implementation of [`ProviderRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderRepository {
    storage: Arc<RwLock<ProviderTable>>,
}

impl InMemoryProviderRepository {
    /// Creates a new empty in-memory provider repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all providers and resets ID assignment.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.rows.clear();
        storage.last_id = 0;
    }
}

#[async_trait]
impl ProviderRepository for InMemoryProviderRepository {
    async fn create(&self, mut config: ProviderConfig) -> RepositoryResult<ProviderConfig> {
        let mut storage = self.storage.write().await;
        storage.last_id += 1;
        config.set_id(ProviderId::new(storage.last_id));
        storage.rows.insert(config.id(), config.clone());
        Ok(config)
    }

    async fn save(&self, config: &ProviderConfig) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.last_id = storage.last_id.max(config.id().get());
        storage.rows.insert(config.id(), config.clone());
        Ok(())
    }

    async fn get(&self, id: ProviderId) -> RepositoryResult<Option<ProviderConfig>> {
        let storage = self.storage.read().await;
        Ok(storage.rows.get(&id).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<ProviderConfig>> {
        let storage = self.storage.read().await;
        let mut all: Vec<ProviderConfig> = storage.rows.values().cloned().collect();
        all.sort_by_key(ProviderConfig::id);
        Ok(all)
    }

    async fn find_active(&self) -> RepositoryResult<Vec<ProviderConfig>> {
        let storage = self.storage.read().await;
        let mut active: Vec<ProviderConfig> = storage
            .rows
            .values()
            .filter(|c| c.is_active())
            .cloned()
            .collect();
        active.sort_by(|a, b| a.name().cmp(b.name()).then(a.id().cmp(&b.id())));
        Ok(active)
    }

    async fn delete(&self, id: ProviderId) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.rows.remove(&id).is_some())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.rows.len() as u64)
    }
}
