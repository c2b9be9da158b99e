//! User repository trait defining the interface for account persistence.
//!
//! The authentication core never touches a database directly; it only
//! depends on this narrow contract, which the infrastructure layer
//! implements against the actual store.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// `save` is an upsert: the entity already carries its id, so a first save
/// inserts and subsequent saves replace. Security-state updates
/// (`record_failed_login` / `record_login`) flow through `save` as plain
/// read-modify-write; there is no optimistic-concurrency token, so
/// concurrent logins against the same account can lose counter updates.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    /// * `Err(DomainError)` - Store error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Persist a user (insert or replace), returning the stored entity
    async fn save(&self, user: User) -> Result<User, DomainError>;

    /// Check whether an account exists for the given email
    async fn exists_by_email(&self, email: &str) -> Result<bool, DomainError>;
}
