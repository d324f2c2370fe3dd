//! Project repository trait

use async_trait::async_trait;

use super::{Project, ProjectId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for Project persistence
#[async_trait]
pub trait ProjectRepository: Send + Sync + std::fmt::Debug {
    /// Get a project by ID
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError>;

    /// List all projects owned by a user, newest first
    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Project>, DomainError>;

    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project, DomainError>;

    /// Delete a project and everything under it; returns false if absent
    async fn delete(&self, id: ProjectId) -> Result<bool, DomainError>;
}
