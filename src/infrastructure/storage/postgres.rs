//! PostgreSQL store with connection pooling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use uuid::Uuid;

use crate::domain::project::{DocType, Project, ProjectId, ProjectRepository};
use crate::domain::revision::{Revision, RevisionId, RevisionRepository};
use crate::domain::section::{Section, SectionId, SectionRepository, SectionStatus};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 10,
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// PostgreSQL implementation of all repositories
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the schema if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id UUID PRIMARY KEY,
                title TEXT NOT NULL,
                doc_type TEXT NOT NULL,
                owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS sections (
                id UUID PRIMARY KEY,
                project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                title TEXT NOT NULL,
                content TEXT,
                version INTEGER NOT NULL DEFAULT 1,
                status TEXT NOT NULL DEFAULT 'pending',
                summary TEXT,
                guidance TEXT,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS revisions (
                id UUID PRIMARY KEY,
                section_id UUID NOT NULL REFERENCES sections(id) ON DELETE CASCADE,
                version INTEGER NOT NULL,
                content TEXT NOT NULL,
                score DOUBLE PRECISION,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;
        }

        Ok(())
    }
}

fn storage_error(err: sqlx::Error) -> DomainError {
    DomainError::storage(err.to_string())
}

fn user_from_row(row: &PgRow) -> Result<User, DomainError> {
    Ok(User::from_parts(
        UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage_error)?),
        row.try_get::<String, _>("email").map_err(storage_error)?,
        row.try_get::<String, _>("password_hash")
            .map_err(storage_error)?,
        row.try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage_error)?,
    ))
}

fn project_from_row(row: &PgRow) -> Result<Project, DomainError> {
    let doc_type: String = row.try_get("doc_type").map_err(storage_error)?;

    Ok(Project::from_parts(
        ProjectId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage_error)?),
        row.try_get::<String, _>("title").map_err(storage_error)?,
        DocType::parse(&doc_type)?,
        UserId::from_uuid(row.try_get::<Uuid, _>("owner_id").map_err(storage_error)?),
        row.try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage_error)?,
    ))
}

fn section_from_row(row: &PgRow) -> Result<Section, DomainError> {
    let status: String = row.try_get("status").map_err(storage_error)?;
    let status = SectionStatus::parse(&status)
        .ok_or_else(|| DomainError::storage(format!("Unknown section status '{}'", status)))?;
    let version: i32 = row.try_get("version").map_err(storage_error)?;

    Ok(Section::from_parts(
        SectionId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage_error)?),
        ProjectId::from_uuid(row.try_get::<Uuid, _>("project_id").map_err(storage_error)?),
        row.try_get::<String, _>("title").map_err(storage_error)?,
        row.try_get::<Option<String>, _>("content")
            .map_err(storage_error)?,
        version as u32,
        status,
        row.try_get::<Option<String>, _>("summary")
            .map_err(storage_error)?,
        row.try_get::<Option<String>, _>("guidance")
            .map_err(storage_error)?,
        row.try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage_error)?,
    ))
}

fn revision_from_row(row: &PgRow) -> Result<Revision, DomainError> {
    let version: i32 = row.try_get("version").map_err(storage_error)?;

    Ok(Revision::from_parts(
        RevisionId::from_uuid(row.try_get::<Uuid, _>("id").map_err(storage_error)?),
        SectionId::from_uuid(row.try_get::<Uuid, _>("section_id").map_err(storage_error)?),
        version as u32,
        row.try_get::<String, _>("content").map_err(storage_error)?,
        row.try_get::<Option<f64>, _>("score").map_err(storage_error)?,
        row.try_get::<DateTime<Utc>, _>("created_at")
            .map_err(storage_error)?,
    ))
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row =
            sqlx::query("SELECT id, email, password_hash, created_at FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_error)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id().as_uuid())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(user.created_at())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(DomainError::conflict("Email already registered"))
            }
            Err(err) => Err(storage_error(err)),
        }
    }
}

#[async_trait]
impl ProjectRepository for PostgresStore {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        let row = sqlx::query(
            "SELECT id, title, doc_type, owner_id, created_at FROM projects WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(project_from_row).transpose()
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Project>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, title, doc_type, owner_id, created_at FROM projects \
             WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(project_from_row).collect()
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        sqlx::query(
            "INSERT INTO projects (id, title, doc_type, owner_id, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(project.id().as_uuid())
        .bind(project.title())
        .bind(project.doc_type().as_str())
        .bind(project.owner_id().as_uuid())
        .bind(project.created_at())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SectionRepository for PostgresStore {
    async fn get(&self, id: SectionId) -> Result<Option<Section>, DomainError> {
        let row = sqlx::query(
            "SELECT id, project_id, title, content, version, status, summary, guidance, \
             created_at FROM sections WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.as_ref().map(section_from_row).transpose()
    }

    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Section>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, project_id, title, content, version, status, summary, guidance, \
             created_at FROM sections WHERE project_id = $1 ORDER BY created_at ASC",
        )
        .bind(project_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(section_from_row).collect()
    }

    async fn create(&self, section: Section) -> Result<Section, DomainError> {
        sqlx::query(
            "INSERT INTO sections (id, project_id, title, content, version, status, summary, \
             guidance, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(section.id().as_uuid())
        .bind(section.project_id().as_uuid())
        .bind(section.title())
        .bind(section.content())
        .bind(section.version() as i32)
        .bind(section.status().as_str())
        .bind(section.summary())
        .bind(section.guidance())
        .bind(section.created_at())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(section)
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM sections WHERE project_id = $1")
            .bind(project_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }

    async fn update_with_revision(
        &self,
        section: &Section,
        revision: &Revision,
    ) -> Result<(), DomainError> {
        // Revision append and section overwrite commit together or not at all
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query(
            "INSERT INTO revisions (id, section_id, version, content, score, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(revision.id().as_uuid())
        .bind(revision.section_id().as_uuid())
        .bind(revision.version() as i32)
        .bind(revision.content())
        .bind(revision.score())
        .bind(revision.created_at())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        let result = sqlx::query(
            "UPDATE sections SET content = $2, version = $3, status = $4 WHERE id = $1",
        )
        .bind(section.id().as_uuid())
        .bind(section.content())
        .bind(section.version() as i32)
        .bind(section.status().as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(storage_error)?;
            return Err(DomainError::not_found(format!(
                "Section '{}' not found",
                section.id()
            )));
        }

        tx.commit().await.map_err(storage_error)
    }
}

#[async_trait]
impl RevisionRepository for PostgresStore {
    async fn list_for_section(&self, section_id: SectionId) -> Result<Vec<Revision>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, section_id, version, content, score, created_at FROM revisions \
             WHERE section_id = $1 ORDER BY created_at DESC",
        )
        .bind(section_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(revision_from_row).collect()
    }
}
