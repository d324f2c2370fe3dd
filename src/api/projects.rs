//! Project API endpoints
//!
//! Project CRUD, outline management, whole-project generation, and export.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::api::middleware::RequireUser;
use crate::api::sections::SectionResponse;
use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::export::ExportSection;
use crate::domain::project::{DocType, Project, ProjectId};
use crate::domain::section::Section;
use crate::domain::user::User;
use crate::domain::workflow::CycleRequest;

/// Create the project router
pub fn create_project_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project))
        .route("/my", get(list_my_projects))
        .route("/{id}", get(get_project).delete(delete_project))
        .route("/{id}/outline", post(submit_outline))
        .route("/{id}/sections", get(list_sections))
        .route("/{id}/generate", post(generate_all))
        .route("/{id}/export", get(export_project))
}

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    pub doc_type: String,
}

/// Project response (without sections)
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub doc_type: String,
    pub created_at: String,
}

impl ProjectResponse {
    fn from_project(project: &Project) -> Self {
        Self {
            id: project.id().to_string(),
            title: project.title().to_string(),
            doc_type: project.doc_type().as_str().to_string(),
            created_at: project.created_at().to_rfc3339(),
        }
    }
}

/// Project response with its section list
#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    #[serde(flatten)]
    pub project: ProjectResponse,
    pub sections: Vec<SectionResponse>,
}

/// One outline entry
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct OutlineSectionRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub title: String,
    pub summary: Option<String>,
    pub guidance: Option<String>,
}

/// Outline submission: the full ordered section list for the project
#[derive(Debug, Deserialize, Validate)]
pub struct OutlineRequest {
    #[validate(
        length(min = 1, message = "outline must contain at least one section"),
        nested
    )]
    pub sections: Vec<OutlineSectionRequest>,
}

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub format: Option<String>,
}

/// Export response
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub format: String,
    pub sections: usize,
}

/// Load a project and enforce that the caller owns it
async fn owned_project(
    state: &AppState,
    user: &User,
    id: ProjectId,
) -> Result<Project, ApiError> {
    let project = state
        .projects
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if !project.is_owned_by(user.id()) {
        return Err(ApiError::forbidden("You do not own this project"));
    }

    Ok(project)
}

fn parse_project_id(id: &str) -> Result<ProjectId, ApiError> {
    id.parse()
        .map_err(|_| ApiError::bad_request("Invalid project id"))
}

/// Create a new project
///
/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let doc_type = DocType::parse(&request.doc_type)?;
    let project = state
        .projects
        .create(Project::new(request.title, doc_type, user.id()))
        .await?;

    info!(project_id = %project.id(), doc_type = %doc_type, "created project");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_project(&project)),
    ))
}

/// List the caller's projects, newest first
///
/// GET /projects/my
pub async fn list_my_projects(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<ProjectResponse>>, ApiError> {
    let projects = state.projects.list_for_owner(user.id()).await?;

    Ok(Json(
        projects.iter().map(ProjectResponse::from_project).collect(),
    ))
}

/// Get a project with its section list
///
/// GET /projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetailResponse>, ApiError> {
    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;
    let sections = state.sections.list_for_project(project.id()).await?;

    Ok(Json(ProjectDetailResponse {
        project: ProjectResponse::from_project(&project),
        sections: sections.iter().map(SectionResponse::from_section).collect(),
    }))
}

/// Delete a project and everything under it
///
/// DELETE /projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;

    state.projects.delete(project.id()).await?;
    info!(project_id = %project.id(), "deleted project");

    Ok(StatusCode::NO_CONTENT)
}

/// Replace the project's sections with a fresh pending outline
///
/// POST /projects/{id}/outline
///
/// Existing sections and their revisions are discarded.
pub async fn submit_outline(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(request): Json<OutlineRequest>,
) -> Result<(StatusCode, Json<Vec<SectionResponse>>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;

    state.sections.delete_for_project(project.id()).await?;

    let mut created = Vec::with_capacity(request.sections.len());
    for entry in request.sections {
        let mut section = Section::new(project.id(), entry.title);
        if let Some(summary) = entry.summary {
            section = section.with_summary(summary);
        }
        if let Some(guidance) = entry.guidance {
            section = section.with_guidance(guidance);
        }
        created.push(state.sections.create(section).await?);
    }

    info!(
        project_id = %project.id(),
        sections = created.len(),
        "outline replaced"
    );

    Ok((
        StatusCode::CREATED,
        Json(created.iter().map(SectionResponse::from_section).collect()),
    ))
}

/// List a project's sections in document order
///
/// GET /projects/{id}/sections
pub async fn list_sections(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<SectionResponse>>, ApiError> {
    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;
    let sections = state.sections.list_for_project(project.id()).await?;

    Ok(Json(
        sections.iter().map(SectionResponse::from_section).collect(),
    ))
}

/// Run the full generation cycle for every section of the project
///
/// POST /projects/{id}/generate
///
/// Sections are processed in document order; each completed cycle is
/// persisted before the next section starts, so a mid-run failure leaves
/// the earlier sections saved.
pub async fn generate_all(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<SectionResponse>>, ApiError> {
    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;
    let sections = state.sections.list_for_project(project.id()).await?;

    if sections.is_empty() {
        return Err(ApiError::bad_request("Project has no outline yet"));
    }

    // Each section is generated against the project title as context
    let request =
        CycleRequest::new().with_context_summary(format!("Project: {}", project.title()));

    let mut results = Vec::with_capacity(sections.len());
    for section in &sections {
        state.driver.run(section, &project, &request).await?;

        // Re-read so the response reflects the committed row
        let saved = state
            .sections
            .get(section.id())
            .await?
            .ok_or_else(|| ApiError::internal("Section vanished during generation"))?;
        results.push(SectionResponse::from_section(&saved));
    }

    info!(project_id = %project.id(), sections = results.len(), "generated project");

    Ok(Json(results))
}

/// Export the finished document
///
/// GET /projects/{id}/export?format=
///
/// Sections without content are skipped; exporting a project with no
/// content at all is an error.
pub async fn export_project(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportResponse>, ApiError> {
    let project = owned_project(&state, &user, parse_project_id(&id)?).await?;

    let format = match query.format.as_deref() {
        Some(value) => DocType::parse(value)?,
        None => project.doc_type(),
    };

    let sections = state.sections.list_for_project(project.id()).await?;
    let export_sections: Vec<ExportSection> = sections
        .iter()
        .filter_map(|s| {
            s.content().map(|content| ExportSection {
                title: s.title().to_string(),
                content: content.to_string(),
            })
        })
        .collect();

    if export_sections.is_empty() {
        return Err(ApiError::bad_request(
            "Nothing to export: no section has content yet",
        ));
    }

    let path = state
        .exporter
        .export(project.title(), format, &export_sections)?;

    Ok(Json(ExportResponse {
        path: path.display().to_string(),
        format: format.as_str().to_string(),
        sections: export_sections.len(),
    }))
}
