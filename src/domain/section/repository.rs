//! Section repository trait

use async_trait::async_trait;

use super::{Section, SectionId};
use crate::domain::project::ProjectId;
use crate::domain::revision::Revision;
use crate::domain::DomainError;

/// Repository trait for Section persistence
#[async_trait]
pub trait SectionRepository: Send + Sync + std::fmt::Debug {
    /// Get a section by ID
    async fn get(&self, id: SectionId) -> Result<Option<Section>, DomainError>;

    /// List a project's sections in creation order
    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Section>, DomainError>;

    /// Create a new section
    async fn create(&self, section: Section) -> Result<Section, DomainError>;

    /// Remove all sections (and their revisions) under a project.
    /// Used when an outline is re-submitted.
    async fn delete_for_project(&self, project_id: ProjectId) -> Result<(), DomainError>;

    /// Commit one completed cycle: append the revision and overwrite the
    /// live section as a single atomic unit. Either both writes become
    /// visible or neither does.
    async fn update_with_revision(
        &self,
        section: &Section,
        revision: &Revision,
    ) -> Result<(), DomainError>;
}
