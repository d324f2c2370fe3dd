//! User repository trait

use async_trait::async_trait;

use super::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for User persistence
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Get a user by ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Look up a user by login email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user; fails with Conflict if the email is taken
    async fn create(&self, user: User) -> Result<User, DomainError>;
}
