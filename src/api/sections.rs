//! Section API endpoints
//!
//! Single-section reads, the refine cycle, and the revision history.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::project::Project;
use crate::domain::revision::Revision;
use crate::domain::section::{Section, SectionId};
use crate::domain::user::User;
use crate::domain::workflow::{CycleRequest, Feedback};

/// Create the section router
pub fn create_section_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_section))
        .route("/{id}/refine", post(refine_section))
        .route("/{id}/revisions", get(list_revisions))
}

/// Section response
#[derive(Debug, Serialize)]
pub struct SectionResponse {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub version: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guidance: Option<String>,
    pub created_at: String,
}

impl SectionResponse {
    pub fn from_section(section: &Section) -> Self {
        Self {
            id: section.id().to_string(),
            project_id: section.project_id().to_string(),
            title: section.title().to_string(),
            content: section.content().map(|c| c.to_string()),
            version: section.version(),
            status: section.status().as_str().to_string(),
            summary: section.summary().map(|s| s.to_string()),
            guidance: section.guidance().map(|g| g.to_string()),
            created_at: section.created_at().to_rfc3339(),
        }
    }
}

/// Refine cycle request
#[derive(Debug, Deserialize)]
pub struct RefineRequest {
    /// "like", "dislike", or absent
    pub feedback: Option<String>,
    pub user_prompt: Option<String>,
    /// Client-held draft used instead of the stored content
    pub current_content: Option<String>,
    /// When false the cycle result is returned without being saved
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_persist() -> bool {
    true
}

/// Refine cycle response
#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub id: String,
    pub content: String,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub persisted: bool,
}

/// Revision response
#[derive(Debug, Serialize)]
pub struct RevisionResponse {
    pub id: String,
    pub section_id: String,
    pub version: u32,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub created_at: String,
}

impl RevisionResponse {
    fn from_revision(revision: &Revision) -> Self {
        Self {
            id: revision.id().to_string(),
            section_id: revision.section_id().to_string(),
            version: revision.version(),
            content: revision.content().to_string(),
            score: revision.score(),
            created_at: revision.created_at().to_rfc3339(),
        }
    }
}

fn parse_section_id(id: &str) -> Result<SectionId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::bad_request("Invalid section id"))
}

/// Load a section plus its project, enforcing ownership
async fn owned_section(
    state: &AppState,
    user: &User,
    id: SectionId,
) -> Result<(Section, Project), ApiError> {
    let section = state
        .sections
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Section not found"))?;

    let project = state
        .projects
        .get(section.project_id())
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if !project.is_owned_by(user.id()) {
        return Err(ApiError::forbidden("You do not own this section"));
    }

    Ok((section, project))
}

/// Get a single section
///
/// GET /sections/{id}
pub async fn get_section(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<SectionResponse>, ApiError> {
    let (section, _) = owned_section(&state, &user, parse_section_id(&id)?).await?;

    Ok(Json(SectionResponse::from_section(&section)))
}

/// Run one generation/refinement cycle for a section
///
/// POST /sections/{id}/refine
///
/// Feedback routes the cycle: "like" accepts the current text as-is,
/// "dislike" forces a single refinement pass against it, anything else runs
/// the full generate/evaluate/refine loop. With `persist: false` the result
/// is returned as a preview and nothing is written.
pub async fn refine_section(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, ApiError> {
    let (section, project) = owned_section(&state, &user, parse_section_id(&id)?).await?;

    let mut cycle = CycleRequest::new()
        .with_feedback(Feedback::parse(request.feedback.as_deref()))
        .with_persist(request.persist);
    if let Some(prompt) = request.user_prompt {
        cycle = cycle.with_user_prompt(prompt);
    }
    if let Some(content) = request.current_content {
        cycle = cycle.with_current_content(content);
    }

    let outcome = state.driver.run(&section, &project, &cycle).await?;

    info!(
        section_id = %section.id(),
        version = outcome.version,
        persisted = outcome.persisted,
        "refine cycle finished"
    );

    Ok(Json(RefineResponse {
        id: section.id().to_string(),
        content: outcome.content,
        version: outcome.version,
        score: outcome.score,
        persisted: outcome.persisted,
    }))
}

/// List a section's revision history, newest first
///
/// GET /sections/{id}/revisions
pub async fn list_revisions(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<RevisionResponse>>, ApiError> {
    let (section, _) = owned_section(&state, &user, parse_section_id(&id)?).await?;

    let revisions = state.revisions.list_for_section(section.id()).await?;

    Ok(Json(
        revisions.iter().map(RevisionResponse::from_revision).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::ProjectId;

    #[test]
    fn test_persist_defaults_to_true() {
        let request: RefineRequest = serde_json::from_str(r#"{"feedback": "like"}"#).unwrap();
        assert!(request.persist);
        assert_eq!(request.feedback.as_deref(), Some("like"));
    }

    #[test]
    fn test_persist_can_be_disabled() {
        let request: RefineRequest = serde_json::from_str(r#"{"persist": false}"#).unwrap();
        assert!(!request.persist);
    }

    #[test]
    fn test_section_response_omits_missing_content() {
        let section = Section::new(ProjectId::generate(), "Introduction");
        let json = serde_json::to_string(&SectionResponse::from_section(&section)).unwrap();
        assert!(!json.contains("\"content\""));
        assert!(json.contains("\"status\":\"pending\""));
    }

    #[test]
    fn test_section_id_parsing() {
        assert!(parse_section_id("garbage").is_err());
        assert!(parse_section_id(&SectionId::generate().to_string()).is_ok());
    }
}
