//! Application state for shared services

use std::sync::Arc;

use crate::domain::export::DocumentExporter;
use crate::domain::project::ProjectRepository;
use crate::domain::revision::RevisionRepository;
use crate::domain::section::SectionRepository;
use crate::domain::user::UserRepository;
use crate::domain::workflow::WorkflowDriver;
use crate::infrastructure::auth::{JwtService, PasswordHasher};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub sections: Arc<dyn SectionRepository>,
    pub revisions: Arc<dyn RevisionRepository>,
    pub driver: Arc<WorkflowDriver>,
    pub jwt_service: Arc<JwtService>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub exporter: Arc<dyn DocumentExporter>,
}

impl AppState {
    /// Create new application state with provided services
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        projects: Arc<dyn ProjectRepository>,
        sections: Arc<dyn SectionRepository>,
        revisions: Arc<dyn RevisionRepository>,
        driver: Arc<WorkflowDriver>,
        jwt_service: Arc<JwtService>,
        password_hasher: Arc<dyn PasswordHasher>,
        exporter: Arc<dyn DocumentExporter>,
    ) -> Self {
        Self {
            users,
            projects,
            sections,
            revisions,
            driver,
            jwt_service,
            password_hasher,
            exporter,
        }
    }
}
