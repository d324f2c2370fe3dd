//! Project entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
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

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Target document format for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Word-style report
    Docx,
    /// Slide deck
    Pptx,
}

impl DocType {
    /// Parse from the wire representation
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "docx" => Ok(Self::Docx),
            "pptx" => Ok(Self::Pptx),
            other => Err(DomainError::validation(format!(
                "doc_type must be 'docx' or 'pptx', got '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Pptx => "pptx",
        }
    }
}

impl std::fmt::Display for DocType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A document under construction, owning an ordered set of sections
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    id: ProjectId,
    /// Display title, also used as the document title on export
    title: String,
    /// Target format
    doc_type: DocType,
    /// Owning user
    owner_id: UserId,
    /// Creation timestamp
    created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(title: impl Into<String>, doc_type: DocType, owner_id: UserId) -> Self {
        Self {
            id: ProjectId::generate(),
            title: title.into(),
            doc_type,
            owner_id,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a project from stored fields
    pub fn from_parts(
        id: ProjectId,
        title: impl Into<String>,
        doc_type: DocType,
        owner_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            doc_type,
            owner_id,
            created_at,
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check whether the given user owns this project
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}
