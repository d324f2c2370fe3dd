//! Revision repository trait

use async_trait::async_trait;

use super::Revision;
use crate::domain::section::SectionId;
use crate::domain::DomainError;

/// Repository trait for the append-only revision log.
///
/// Deliberately has no update or delete: revisions are an audit trail.
/// Appends normally happen through `SectionRepository::update_with_revision`
/// so they commit together with the section overwrite.
#[async_trait]
pub trait RevisionRepository: Send + Sync + std::fmt::Debug {
    /// List a section's revisions, newest first
    async fn list_for_section(&self, section_id: SectionId) -> Result<Vec<Revision>, DomainError>;
}
