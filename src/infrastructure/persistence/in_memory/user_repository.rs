//! # In-Memory User Repository
//!
//! In-memory implementation of [`UserRepository`].

use crate::domain::entities::User;
use crate::domain::value_objects::UserId;
use crate::infrastructure::persistence::traits::{
    RepositoryError, RepositoryResult, UserRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`UserRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Creates a new empty in-memory user repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn save(&self, user: &User) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let taken = storage
            .values()
            .any(|other| other.id() != user.id() && other.auth_subject() == user.auth_subject());
        if taken {
            return Err(RepositoryError::duplicate("User", user.auth_subject()));
        }
        storage.insert(user.id(), user.clone());
        Ok(())
    }

    async fn get(&self, id: UserId) -> RepositoryResult<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage.get(&id).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<User>> {
        let storage = self.storage.read().await;
        let mut users: Vec<User> = storage.values().cloned().collect();
        users.sort_by_key(User::id);
        Ok(users)
    }

    async fn find_by_auth_subject(&self, subject: &str) -> RepositoryResult<Option<User>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .find(|user| user.auth_subject() == subject)
            .cloned())
    }
}
