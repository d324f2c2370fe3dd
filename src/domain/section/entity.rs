//! Section entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::project::ProjectId;

/// Section identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(Uuid);

impl SectionId {
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

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SectionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Lifecycle status of a section's live content.
///
/// Advances Pending -> Generated -> Refined and never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// No content generated yet
    #[default]
    Pending,
    /// First content produced
    Generated,
    /// Content has been through at least one refinement cycle
    Refined,
}

impl SectionStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "generated" => Some(Self::Generated),
            "refined" => Some(Self::Refined),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Generated => "generated",
            Self::Refined => "refined",
        }
    }
}

impl std::fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One titled unit of a document. Holds the single live content/version;
/// history lives in the revision log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier
    id: SectionId,
    /// Owning project
    project_id: ProjectId,
    /// Section title
    title: String,
    /// Current live content; None until first generation
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    /// Current version, 1-indexed
    version: u32,
    /// Lifecycle status
    status: SectionStatus,
    /// Optional stored summary used as generation context
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    /// Optional stored authoring guidance used as generation context
    #[serde(skip_serializing_if = "Option::is_none")]
    guidance: Option<String>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Section {
    /// Create a new pending section with no content
    pub fn new(project_id: ProjectId, title: impl Into<String>) -> Self {
        Self {
            id: SectionId::generate(),
            project_id,
            title: title.into(),
            content: None,
            version: 1,
            status: SectionStatus::Pending,
            summary: None,
            guidance: None,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a section from stored fields
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: SectionId,
        project_id: ProjectId,
        title: impl Into<String>,
        content: Option<String>,
        version: u32,
        status: SectionStatus,
        summary: Option<String>,
        guidance: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            project_id,
            title: title.into(),
            content,
            version,
            status,
            summary,
            guidance,
            created_at,
        }
    }

    pub fn id(&self) -> SectionId {
        self.id
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn status(&self) -> SectionStatus {
        self.status
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn guidance(&self) -> Option<&str> {
        self.guidance.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_guidance(mut self, guidance: impl Into<String>) -> Self {
        self.guidance = Some(guidance.into());
        self
    }

    /// Overwrite the live content and version after a completed cycle and
    /// advance the status. Status never regresses: applying Generated to an
    /// already-Refined section leaves it Refined.
    pub fn apply_cycle(&mut self, content: impl Into<String>, version: u32, status: SectionStatus) {
        self.content = Some(content.into());
        self.version = version;
        if status > self.status {
            self.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_section() -> Section {
        Section::new(ProjectId::generate(), "Introduction")
    }

    #[test]
    fn test_new_section_is_pending() {
        let section = test_section();
        assert_eq!(section.status(), SectionStatus::Pending);
        assert_eq!(section.version(), 1);
        assert!(section.content().is_none());
    }

    #[test]
    fn test_apply_cycle_advances_status() {
        let mut section = test_section();

        section.apply_cycle("first draft", 1, SectionStatus::Generated);
        assert_eq!(section.status(), SectionStatus::Generated);
        assert_eq!(section.content(), Some("first draft"));

        section.apply_cycle("better draft", 2, SectionStatus::Refined);
        assert_eq!(section.status(), SectionStatus::Refined);
        assert_eq!(section.version(), 2);
    }

    #[test]
    fn test_status_never_regresses() {
        let mut section = test_section();
        section.apply_cycle("draft", 2, SectionStatus::Refined);
        section.apply_cycle("redone", 3, SectionStatus::Generated);

        assert_eq!(section.status(), SectionStatus::Refined);
        assert_eq!(section.version(), 3);
    }

    #[test]
    fn test_status_ordering() {
        assert!(SectionStatus::Pending < SectionStatus::Generated);
        assert!(SectionStatus::Generated < SectionStatus::Refined);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(SectionStatus::parse("refined"), Some(SectionStatus::Refined));
        assert_eq!(SectionStatus::parse("bogus"), None);
    }
}
