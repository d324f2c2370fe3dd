//! Domain layer: entities, repository traits, the generation capability
//! boundary, and the section workflow core.

pub mod error;
pub mod export;
pub mod generation;
pub mod project;
pub mod revision;
pub mod section;
pub mod user;
pub mod workflow;

pub use error::DomainError;
pub use export::{DocumentExporter, ExportSection};
pub use generation::{Evaluation, GenerationError, SectionGenerator};
pub use project::{DocType, Project, ProjectId, ProjectRepository};
pub use revision::{Revision, RevisionId, RevisionRepository};
pub use section::{Section, SectionId, SectionRepository, SectionStatus};
pub use user::{User, UserId, UserRepository};
pub use workflow::{
    CycleOutcome, CycleRequest, Feedback, WorkflowConfig, WorkflowDriver, WorkflowError,
    WorkflowState,
};
