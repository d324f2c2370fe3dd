//! docsmith - AI document builder API
//!
//! Assembles multi-section documents whose text is produced by an external
//! LLM through bounded generate/evaluate/refine cycles.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::generation::SectionGenerator;
use domain::workflow::WorkflowDriver;
use infrastructure::auth::{Argon2Hasher, JwtConfig, JwtService};
use infrastructure::export::MarkdownExporter;
use infrastructure::llm::{GeminiGenerator, HttpClient};
use infrastructure::storage::{InMemoryStore, PostgresConfig, PostgresStore};

/// Wire the application state from configuration.
///
/// With a configured database URL the Postgres store backs all repositories;
/// otherwise everything lives in memory and is lost on shutdown.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let client = HttpClient::with_timeout(Duration::from_secs(60))?;
    let generator: Arc<dyn SectionGenerator> = Arc::new(GeminiGenerator::new(
        client,
        config.llm.api_key.clone(),
        config.llm.model.clone(),
        config.llm.base_url.clone(),
    ));

    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_hours,
    )));
    let password_hasher = Arc::new(Argon2Hasher::new());
    let exporter = Arc::new(MarkdownExporter::new(config.export.output_dir.clone()));

    let state = match &config.database.url {
        Some(url) => {
            info!("Using Postgres storage");
            let store = Arc::new(
                PostgresStore::connect(
                    &PostgresConfig::new(url.clone())
                        .with_max_connections(config.database.max_connections),
                )
                .await?,
            );
            store.ensure_schema().await?;

            let driver = Arc::new(WorkflowDriver::new(
                generator,
                store.clone(),
                config.workflow_config(),
            ));

            AppState::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                driver,
                jwt_service,
                password_hasher,
                exporter,
            )
        }
        None => {
            info!("No database configured, using in-memory storage");
            let store = Arc::new(InMemoryStore::new());

            let driver = Arc::new(WorkflowDriver::new(
                generator,
                store.clone(),
                config.workflow_config(),
            ));

            AppState::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                driver,
                jwt_service,
                password_hasher,
                exporter,
            )
        }
    };

    Ok(state)
}
