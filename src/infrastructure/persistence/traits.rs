//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The quoting path only reads through these ports; writes come from the
//! administrative API and from seed fixtures.
//!
//! # Available Repositories
//!
//! - [`ProviderRepository`]: carrier configurations
//! - [`PricingRuleRepository`]: user pricing rules in three scopes
//! - [`UserRepository`]: user accounts
//!
//! # Examples
//!
//! ```ignore
//! use shipquote::infrastructure::persistence::traits::ProviderRepository;
//!
//! async fn list_active(repo: &impl ProviderRepository) {
//!     let active = repo.find_active().await.unwrap();
//!     println!("Found {} active providers", active.len());
//! }
//! ```

use crate::domain::entities::{
    GlobalPricingRule, ProviderConfig, ProviderPricingRule, ServicePricingOverride, User,
};
use crate::domain::services::PricingRuleLookup;
use crate::domain::value_objects::{ProviderId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for carrier configurations.
#[async_trait]
pub trait ProviderRepository: Send + Sync + fmt::Debug {
    /// Stores a new provider under a freshly assigned ID.
    ///
    /// The ID carried by `config` is ignored. Returns the stored record.
    async fn create(&self, config: ProviderConfig) -> RepositoryResult<ProviderConfig>;

    /// Saves a provider under its own ID, replacing any previous record.
    async fn save(&self, config: &ProviderConfig) -> RepositoryResult<()>;

    /// Gets a provider by ID.
    ///
    /// Returns `None` if the provider does not exist.
    async fn get(&self, id: ProviderId) -> RepositoryResult<Option<ProviderConfig>>;

    /// Returns every provider ordered by ID.
    async fn get_all(&self) -> RepositoryResult<Vec<ProviderConfig>>;

    /// Returns active providers ordered by name, then ID.
    async fn find_active(&self) -> RepositoryResult<Vec<ProviderConfig>>;

    /// Deletes a provider by ID.
    ///
    /// Returns `Ok(true)` if the provider was deleted, `Ok(false)` if it
    /// didn't exist.
    async fn delete(&self, id: ProviderId) -> RepositoryResult<bool>;

    /// Counts all providers.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for pricing rules.
///
/// Each scope holds at most one rule: saving a rule for an occupied scope
/// replaces the previous one. Lookups come from [`PricingRuleLookup`] and
/// only return active rules.
#[async_trait]
pub trait PricingRuleRepository: PricingRuleLookup {
    /// Saves the global rule of a user.
    async fn save_global(&self, rule: &GlobalPricingRule) -> RepositoryResult<()>;

    /// Saves a provider rule.
    async fn save_provider_rule(&self, rule: &ProviderPricingRule) -> RepositoryResult<()>;

    /// Saves a service override.
    async fn save_service_override(&self, rule: &ServicePricingOverride) -> RepositoryResult<()>;

    /// Removes the global rule of a user.
    async fn remove_global(&self, user_id: UserId) -> RepositoryResult<bool>;

    /// Removes the rule of a user for a provider.
    async fn remove_provider_rule(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
    ) -> RepositoryResult<bool>;

    /// Removes the override of a user for one service of a provider.
    async fn remove_service_override(
        &self,
        user_id: UserId,
        provider_id: ProviderId,
        service_code: &str,
    ) -> RepositoryResult<bool>;
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync + fmt::Debug {
    /// Saves a user, replacing any previous record with the same ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if another user already owns
    /// the same auth subject.
    async fn save(&self, user: &User) -> RepositoryResult<()>;

    /// Gets a user by ID.
    async fn get(&self, id: UserId) -> RepositoryResult<Option<User>>;

    /// Gets all users ordered by ID.
    async fn get_all(&self) -> RepositoryResult<Vec<User>>;

    /// Finds the user a verified auth subject belongs to.
    async fn find_by_auth_subject(&self, subject: &str) -> RepositoryResult<Option<User>>;
}
