//! Revision entity - the append-only audit trail of section content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::section::SectionId;

/// Revision identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(Uuid);

impl RevisionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RevisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable snapshot of a section's content at a given version.
/// One row per persisted completed cycle; never mutated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    /// Unique identifier
    id: RevisionId,
    /// Section this snapshot belongs to
    section_id: SectionId,
    /// Version the section reached with this snapshot
    version: u32,
    /// Snapshot content
    content: String,
    /// Quality score if the cycle produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Revision {
    pub fn new(
        section_id: SectionId,
        version: u32,
        content: impl Into<String>,
        score: Option<f64>,
    ) -> Self {
        Self {
            id: RevisionId::generate(),
            section_id,
            version,
            content: content.into(),
            score,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a revision from stored fields
    pub fn from_parts(
        id: RevisionId,
        section_id: SectionId,
        version: u32,
        content: impl Into<String>,
        score: Option<f64>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            section_id,
            version,
            content: content.into(),
            score,
            created_at,
        }
    }

    pub fn id(&self) -> RevisionId {
        self.id
    }

    pub fn section_id(&self) -> SectionId {
        self.section_id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_creation() {
        let section_id = SectionId::generate();
        let revision = Revision::new(section_id, 3, "final text", Some(8.2));

        assert_eq!(revision.section_id(), section_id);
        assert_eq!(revision.version(), 3);
        assert_eq!(revision.content(), "final text");
        assert_eq!(revision.score(), Some(8.2));
    }

    #[test]
    fn test_scoreless_revision_omits_score() {
        let revision = Revision::new(SectionId::generate(), 2, "liked as-is", None);
        let json = serde_json::to_string(&revision).unwrap();
        assert!(!json.contains("score"));
    }
}
