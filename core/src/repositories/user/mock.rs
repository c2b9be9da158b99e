//! Mock implementation of UserRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

use super::trait_::UserRepository;

/// In-memory user repository for tests
pub struct MockUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MockUserRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a mock repository pre-seeded with a user
    pub async fn with_user(user: User) -> Self {
        let repo = Self::new();
        repo.users.write().await.insert(user.id, user);
        repo
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

impl Default for MockUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;

    fn sample_user(email: &str) -> User {
        User::new(email, "Test", "User", "hash", vec![UserRole::User]).unwrap()
    }

    #[tokio::test]
    async fn save_is_an_upsert() {
        let repo = MockUserRepository::new();
        let mut user = sample_user("a@x.com");

        repo.save(user.clone()).await.unwrap();
        assert_eq!(repo.len().await, 1);

        user.record_failed_login();
        repo.save(user.clone()).await.unwrap();
        assert_eq!(repo.len().await, 1);

        let stored = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.failed_login_attempts, 1);
    }

    #[tokio::test]
    async fn finds_by_email_and_reports_existence() {
        let user = sample_user("b@x.com");
        let repo = MockUserRepository::with_user(user.clone()).await;

        assert!(repo.exists_by_email("b@x.com").await.unwrap());
        assert!(!repo.exists_by_email("missing@x.com").await.unwrap());

        let found = repo.find_by_email("b@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(repo.find_by_email("missing@x.com").await.unwrap().is_none());
    }
}
