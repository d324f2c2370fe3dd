//! Router assembly

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::auth;
use super::health;
use super::projects;
use super::sections;
use super::state::AppState;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Authentication
        .nest("/auth", auth::create_auth_router())
        // Document building
        .nest("/projects", projects::create_project_router())
        .nest("/sections", sections::create_section_router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
