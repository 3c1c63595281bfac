//! # In-Memory Pricing Rule Repository
//!
//! In-memory implementation of [`PricingRuleRepository`] and of the
//! pricing resolver's [`PricingRuleLookup`] port.
//!
//! Rules are keyed by their scope, which makes "one rule per scope" a
//! property of the storage layout rather than something lookups have to
//! resolve.

use crate::domain::entities::{GlobalPricingRule, ProviderPricingRule, ServicePricingOverride};
use crate::domain::services::{PricingResult, PricingRuleLookup};
use crate::domain::value_objects::{ProviderId, UserId};
use crate::infrastructure::persistence::traits::{PricingRuleRepository, RepositoryResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type ServiceKey = (UserId, ProviderId, String);

#[derive(Debug, Default)]
struct RuleTables {
    global: HashMap<UserId, GlobalPricingRule>,
    provider: HashMap<(UserId, ProviderId), ProviderPricingRule>,
    service: HashMap<ServiceKey, ServicePricingOverride>,
}

/// In-memory implementation of [`PricingRuleRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryPricingRuleRepository {
    storage: Arc<RwLock<RuleTables>>,
}

impl InMemoryPricingRuleRepository {
    /// Creates a new empty in-memory rule repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored rules across all scopes.
    pub async fn len(&self) -> usize {
        let storage = self.storage.read().await;
        storage.global.len() + storage.provider.len() + storage.service.len()
    }
}

fn service_key(user_id: UserId, provider_id: ProviderId, service_code: &str) -> ServiceKey {
    (user_id, provider_id, service_code.to_string())
}

#[async_trait]
impl PricingRuleRepository for InMemoryPricingRuleRepository {
    async fn save_global(&self, rule: &GlobalPricingRule) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.global.insert(rule.user_id(), rule.clone());
        Ok(())
    }

    async fn save_provider_rule(&self, rule: &ProviderPricingRule) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage
            .provider
            .insert((rule.user_id(), rule.provider_id()), rule.clone());
        Ok(())
    }

    async fn save_service_override(&self, rule: &ServicePricingOverride) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.service.insert(
            service_key(rule.user_id(), rule.provider_id(), rule.service_code()),
            rule.clone(),
        );
        Ok(())
    }

    async fn remove_global(&self, user_id: UserId) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.global.remove(&user_id).is_some())
    }

    async fn remove_provider_rule(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
    ) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage.provider.remove(&(user_id, provider_id)).is_some())
    }

    async fn remove_service_override(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
        service_code: &str,
    ) -> RepositoryResult<bool> {
        let mut storage = self.storage.write().await;
        Ok(storage
            .service
            .remove(&service_key(user_id, provider_id, service_code))
            .is_some())
    }
}

#[async_trait]
impl PricingRuleLookup for InMemoryPricingRuleRepository {
    async fn find_global(&self, user_id: UserId) -> PricingResult<Option<GlobalPricingRule>> {
        let storage = self.storage.read().await;
        Ok(storage
            .global
            .get(&user_id)
            .filter(|rule| rule.is_active())
            .cloned())
    }

    async fn find_provider_rule(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
    ) -> PricingResult<Option<ProviderPricingRule>> {
        let storage = self.storage.read().await;
        Ok(storage
            .provider
            .get(&(user_id, provider_id))
            .filter(|rule| rule.is_active())
            .cloned())
    }

    async fn find_service_override(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
        service_code: &str,
    ) -> PricingResult<Option<ServicePricingOverride>> {
        let storage = self.storage.read().await;
        Ok(storage
            .service
            .get(&service_key(user_id, provider_id, service_code))
            .filter(|rule| rule.is_active())
            .cloned())
    }
}
