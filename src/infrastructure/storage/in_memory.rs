//! In-memory store for tests and development
//!
//! One mutex guards all tables, so the revision append + section overwrite
//! commit as a single unit, matching the Postgres transaction semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::project::{Project, ProjectId, ProjectRepository};
use crate::domain::revision::{Revision, RevisionRepository};
use crate::domain::section::{Section, SectionId, SectionRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct StoreInner {
    users: HashMap<UserId, User>,
    projects: HashMap<ProjectId, Project>,
    sections: HashMap<SectionId, Section>,
    revisions: Vec<Revision>,
}

/// In-memory implementation of all repositories
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored revisions, for test assertions
    pub fn revision_count(&self) -> usize {
        self.inner.lock().unwrap().revisions.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        Ok(self.inner.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .users
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.users.values().any(|u| u.email() == user.email()) {
            return Err(DomainError::conflict("Email already registered"));
        }

        inner.users.insert(user.id(), user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn get(&self, id: ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.inner.lock().unwrap().projects.get(&id).cloned())
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Project>, DomainError> {
        let mut projects: Vec<Project> = self
            .inner
            .lock()
            .unwrap()
            .projects
            .values()
            .filter(|p| p.owner_id() == owner_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(projects)
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        self.inner
            .lock()
            .unwrap()
            .projects
            .insert(project.id(), project.clone());
        Ok(project)
    }

    async fn delete(&self, id: ProjectId) -> Result<bool, DomainError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.projects.remove(&id).is_none() {
            return Ok(false);
        }

        let section_ids: Vec<SectionId> = inner
            .sections
            .values()
            .filter(|s| s.project_id() == id)
            .map(|s| s.id())
            .collect();

        for section_id in &section_ids {
            inner.sections.remove(section_id);
        }
        inner
            .revisions
            .retain(|r| !section_ids.contains(&r.section_id()));

        Ok(true)
    }
}

#[async_trait]
impl SectionRepository for InMemoryStore {
    async fn get(&self, id: SectionId) -> Result<Option<Section>, DomainError> {
        Ok(self.inner.lock().unwrap().sections.get(&id).cloned())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<Section>, DomainError> {
        let mut sections: Vec<Section> = self
            .inner
            .lock()
            .unwrap()
            .sections
            .values()
            .filter(|s| s.project_id() == project_id)
            .cloned()
            .collect();
        sections.sort_by(|a, b| a.created_at().cmp(&b.created_at()));
        Ok(sections)
    }

    async fn create(&self, section: Section) -> Result<Section, DomainError> {
        self.inner
            .lock()
            .unwrap()
            .sections
            .insert(section.id(), section.clone());
        Ok(section)
    }

    async fn delete_for_project(&self, project_id: ProjectId) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap();

        let section_ids: Vec<SectionId> = inner
            .sections
            .values()
            .filter(|s| s.project_id() == project_id)
            .map(|s| s.id())
            .collect();

        for section_id in &section_ids {
            inner.sections.remove(section_id);
        }
        inner
            .revisions
            .retain(|r| !section_ids.contains(&r.section_id()));

        Ok(())
    }

    async fn update_with_revision(
        &self,
        section: &Section,
        revision: &Revision,
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.sections.contains_key(&section.id()) {
            return Err(DomainError::not_found(format!(
                "Section '{}' not found",
                section.id()
            )));
        }

        inner.sections.insert(section.id(), section.clone());
        inner.revisions.push(revision.clone());
        Ok(())
    }
}

#[async_trait]
impl RevisionRepository for InMemoryStore {
    async fn list_for_section(&self, section_id: SectionId) -> Result<Vec<Revision>, DomainError> {
        let mut revisions: Vec<Revision> = self
            .inner
            .lock()
            .unwrap()
            .revisions
            .iter()
            .filter(|r| r.section_id() == section_id)
            .cloned()
            .collect();
        revisions.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(revisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::DocType;
    use crate::domain::section::SectionStatus;

    #[tokio::test]
    async fn test_user_email_uniqueness() {
        let store = InMemoryStore::new();
        let user = User::new("bob@example.com", "hash");

        UserRepository::create(&store, user).await.unwrap();

        let duplicate = User::new("bob@example.com", "other-hash");
        let err = UserRepository::create(&store, duplicate).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_update_with_revision_commits_both() {
        let store = InMemoryStore::new();
        let project = Project::new("Report", DocType::Docx, UserId::generate());
        let section = SectionRepository::create(&store, Section::new(project.id(), "Intro"))
            .await
            .unwrap();

        let mut updated = section.clone();
        updated.apply_cycle("draft", 1, SectionStatus::Generated);
        let revision = Revision::new(section.id(), 1, "draft", Some(8.0));

        store
            .update_with_revision(&updated, &revision)
            .await
            .unwrap();

        let stored = SectionRepository::get(&store, section.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.content(), Some("draft"));
        assert_eq!(store.revision_count(), 1);

        let revisions = store.list_for_section(section.id()).await.unwrap();
        assert_eq!(revisions.len(), 1);
        assert_eq!(revisions[0].score(), Some(8.0));
    }

    #[tokio::test]
    async fn test_update_with_revision_unknown_section_writes_nothing() {
        let store = InMemoryStore::new();
        let orphan = Section::new(ProjectId::generate(), "Nowhere");
        let revision = Revision::new(orphan.id(), 1, "text", None);

        let err = store
            .update_with_revision(&orphan, &revision)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        assert_eq!(store.revision_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_project_cascades() {
        let store = InMemoryStore::new();
        let owner = UserId::generate();
        let project = ProjectRepository::create(
            &store,
            Project::new("Report", DocType::Docx, owner),
        )
        .await
        .unwrap();

        let section = SectionRepository::create(&store, Section::new(project.id(), "Intro"))
            .await
            .unwrap();
        let mut updated = section.clone();
        updated.apply_cycle("text", 1, SectionStatus::Generated);
        store
            .update_with_revision(&updated, &Revision::new(section.id(), 1, "text", None))
            .await
            .unwrap();

        assert!(ProjectRepository::delete(&store, project.id()).await.unwrap());
        assert!(SectionRepository::get(&store, section.id())
            .await
            .unwrap()
            .is_none());
        assert_eq!(store.revision_count(), 0);
    }

    #[tokio::test]
    async fn test_sections_listed_in_creation_order() {
        let store = InMemoryStore::new();
        let project_id = ProjectId::generate();

        for title in ["One", "Two", "Three"] {
            SectionRepository::create(&store, Section::new(project_id, title))
                .await
                .unwrap();
        }

        let sections = store.list_for_project(project_id).await.unwrap();
        let titles: Vec<&str> = sections.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["One", "Two", "Three"]);
    }
}
