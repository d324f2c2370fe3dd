//! Workflow driver
//!
//! Bridges persisted Section/Project records and the caller's request into a
//! `WorkflowState`, runs the state machine exactly once, and maps the
//! terminal state back into persistence writes.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use super::machine::{SectionWorkflow, WorkflowConfig};
use super::state::{Feedback, WorkflowState};
use crate::domain::generation::{GenerationError, SectionGenerator};
use crate::domain::project::Project;
use crate::domain::revision::Revision;
use crate::domain::section::{Section, SectionRepository, SectionStatus};
use crate::domain::DomainError;

/// Truncation limit for the stored-content context fallback
const CONTEXT_PREVIEW_CHARS: usize = 2000;

/// Errors surfaced by a driver invocation
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The generation capability failed; nothing was persisted
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The cycle completed but the revision/section write failed; the
    /// completed content is lost from durable storage and the caller must
    /// not be told the save succeeded
    #[error("Failed to persist cycle result: {0}")]
    Persistence(#[source] DomainError),
}

/// Caller payload for one refinement cycle
#[derive(Debug, Clone, Default)]
pub struct CycleRequest {
    /// like / dislike / absent (defaults to pending)
    pub feedback: Feedback,
    /// Explicit instruction overriding stored summary/guidance
    pub user_prompt: Option<String>,
    /// Client-held draft used as the base text for like/dislike paths
    /// instead of the stored section content
    pub current_content: Option<String>,
    /// Caller-chosen generation context; when set it replaces the
    /// summary/guidance/preview assembly entirely
    pub context_summary: Option<String>,
    /// When false the cycle runs in preview mode and nothing is written
    pub persist: bool,
}

impl CycleRequest {
    pub fn new() -> Self {
        Self {
            persist: true,
            ..Default::default()
        }
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_user_prompt(mut self, user_prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(user_prompt.into());
        self
    }

    pub fn with_current_content(mut self, content: impl Into<String>) -> Self {
        self.current_content = Some(content.into());
        self
    }

    pub fn with_context_summary(mut self, context_summary: impl Into<String>) -> Self {
        self.context_summary = Some(context_summary.into());
        self
    }

    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }
}

/// Terminal values of one cycle
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub content: String,
    pub version: u32,
    pub score: Option<f64>,
    pub persisted: bool,
}

/// Runs section cycles against the capability and maps results to storage
#[derive(Debug, Clone)]
pub struct WorkflowDriver {
    generator: Arc<dyn SectionGenerator>,
    sections: Arc<dyn SectionRepository>,
    config: WorkflowConfig,
}

impl WorkflowDriver {
    pub fn new(
        generator: Arc<dyn SectionGenerator>,
        sections: Arc<dyn SectionRepository>,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            generator,
            sections,
            config,
        }
    }

    /// Run one cycle for a section, honoring the caller-selected shortcut:
    /// like persists the current text as-is, dislike runs a single refine
    /// call against it, anything else runs the full state machine.
    ///
    /// A like/dislike with no current text anywhere falls through to the
    /// full machine, preserving the always-generate-once behavior.
    pub async fn run(
        &self,
        section: &Section,
        project: &Project,
        request: &CycleRequest,
    ) -> Result<CycleOutcome, WorkflowError> {
        let base_text = request
            .current_content
            .clone()
            .or_else(|| section.content().map(|c| c.to_string()));

        match (request.feedback, base_text) {
            (Feedback::Like, Some(text)) => self.accept_current(section, text, request).await,
            (Feedback::Dislike, Some(text)) => self.refine_once(section, text, request).await,
            _ => self.run_cycle(section, project, request).await,
        }
    }

    /// Full generate -> evaluate -> refine cycle through the state machine
    async fn run_cycle(
        &self,
        section: &Section,
        project: &Project,
        request: &CycleRequest,
    ) -> Result<CycleOutcome, WorkflowError> {
        let context_summary = request
            .context_summary
            .clone()
            .unwrap_or_else(|| build_context_summary(section, request.user_prompt.as_deref()));
        debug!(
            section_id = %section.id(),
            context_chars = context_summary.len(),
            "starting section cycle"
        );

        let state = WorkflowState::new(section.id(), section.title(), project.doc_type())
            .with_content(section.content().map(|c| c.to_string()))
            .with_version(section.version())
            .with_feedback(request.feedback)
            .with_user_prompt(request.user_prompt.clone())
            .with_context_summary(context_summary)
            .with_max_attempts(self.config.max_attempts);

        let workflow = SectionWorkflow::new(self.generator.as_ref(), self.config);
        let terminal = workflow.run(state).await?;

        let content = terminal.content.unwrap_or_default();
        // First-time runs with no prior content land on Generated
        let status = if section.content().is_none() {
            SectionStatus::Generated
        } else {
            SectionStatus::Refined
        };

        self.commit(
            section,
            content,
            terminal.version,
            terminal.score,
            status,
            request.persist,
        )
        .await
    }

    /// Like shortcut: persist the current text as a new revision, no score,
    /// no capability calls.
    async fn accept_current(
        &self,
        section: &Section,
        text: String,
        request: &CycleRequest,
    ) -> Result<CycleOutcome, WorkflowError> {
        debug!(section_id = %section.id(), "accepting current content");
        self.commit(
            section,
            text,
            section.version() + 1,
            None,
            SectionStatus::Refined,
            request.persist,
        )
        .await
    }

    /// Dislike shortcut: exactly one refine capability call against the
    /// current text, no generate/evaluate loop.
    async fn refine_once(
        &self,
        section: &Section,
        text: String,
        request: &CycleRequest,
    ) -> Result<CycleOutcome, WorkflowError> {
        let focus = request
            .user_prompt
            .clone()
            .unwrap_or_else(|| crate::domain::generation::NEUTRAL_IMPROVEMENT_FOCUS.to_string());

        let refined = self
            .generator
            .refine(&text, &focus, request.user_prompt.as_deref())
            .await?;

        self.commit(
            section,
            refined,
            section.version() + 1,
            None,
            SectionStatus::Refined,
            request.persist,
        )
        .await
    }

    /// Map terminal values to storage: append the revision and overwrite the
    /// live section as one atomic unit, or return everything untouched in
    /// preview mode.
    async fn commit(
        &self,
        section: &Section,
        content: String,
        version: u32,
        score: Option<f64>,
        status: SectionStatus,
        persist: bool,
    ) -> Result<CycleOutcome, WorkflowError> {
        if !persist {
            return Ok(CycleOutcome {
                content,
                version,
                score,
                persisted: false,
            });
        }

        let revision = Revision::new(section.id(), version, content.clone(), score);
        let mut updated = section.clone();
        updated.apply_cycle(content.clone(), version, status);

        if let Err(err) = self.sections.update_with_revision(&updated, &revision).await {
            warn!(section_id = %section.id(), error = %err, "failed to persist cycle");
            return Err(WorkflowError::Persistence(err));
        }

        Ok(CycleOutcome {
            content,
            version,
            score,
            persisted: true,
        })
    }
}

/// Assemble the free-form guidance passed to the generate stage.
///
/// Priority: explicit user prompt; else stored summary/guidance fields; else
/// a truncated preview of the current content; else empty.
pub fn build_context_summary(section: &Section, user_prompt: Option<&str>) -> String {
    if let Some(prompt) = user_prompt {
        let trimmed = prompt.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut parts: Vec<String> = Vec::new();

    if let Some(summary) = section.summary() {
        if !summary.trim().is_empty() {
            parts.push(summary.trim().to_string());
        }
    }

    if let Some(guidance) = section.guidance() {
        if !guidance.trim().is_empty() {
            parts.push(format!("Guidance: {}", guidance.trim()));
        }
    }

    if parts.is_empty() {
        if let Some(content) = section.content() {
            let preview: String = content.chars().take(CONTEXT_PREVIEW_CHARS).collect();
            parts.push(format!("Current content: {}", preview));
        }
    }

    parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::scripted::ScriptedGenerator;
    use crate::domain::project::{DocType, ProjectId};
    use crate::domain::section::SectionId;
    use crate::domain::user::UserId;

    use async_trait::async_trait;
    use std::sync::Mutex;

    /// In-memory section store that records committed cycles and can be
    /// told to fail the write.
    #[derive(Debug, Default)]
    struct RecordingSections {
        committed: Mutex<Vec<(Section, Revision)>>,
        fail_write: bool,
    }

    impl RecordingSections {
        fn failing() -> Self {
            Self {
                fail_write: true,
                ..Default::default()
            }
        }

        fn commits(&self) -> Vec<(Section, Revision)> {
            self.committed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SectionRepository for RecordingSections {
        async fn get(&self, _id: SectionId) -> Result<Option<Section>, DomainError> {
            Ok(None)
        }

        async fn list_for_project(
            &self,
            _project_id: ProjectId,
        ) -> Result<Vec<Section>, DomainError> {
            Ok(Vec::new())
        }

        async fn create(&self, section: Section) -> Result<Section, DomainError> {
            Ok(section)
        }

        async fn delete_for_project(&self, _project_id: ProjectId) -> Result<(), DomainError> {
            Ok(())
        }

        async fn update_with_revision(
            &self,
            section: &Section,
            revision: &Revision,
        ) -> Result<(), DomainError> {
            if self.fail_write {
                return Err(DomainError::storage("disk full"));
            }
            self.committed
                .lock()
                .unwrap()
                .push((section.clone(), revision.clone()));
            Ok(())
        }
    }

    fn test_project() -> Project {
        Project::new("Quarterly Report", DocType::Docx, UserId::generate())
    }

    fn driver_with(
        generator: Arc<ScriptedGenerator>,
        sections: Arc<RecordingSections>,
    ) -> WorkflowDriver {
        WorkflowDriver::new(generator, sections, WorkflowConfig::default())
    }

    #[tokio::test]
    async fn full_cycle_persists_revision_and_section() {
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![8.0]));
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator, sections.clone());

        let project = test_project();
        let section = Section::new(project.id(), "Introduction");

        let outcome = driver
            .run(&section, &project, &CycleRequest::new())
            .await
            .unwrap();

        assert!(outcome.persisted);
        assert_eq!(outcome.version, 1);
        assert_eq!(outcome.score, Some(8.0));

        let commits = sections.commits();
        assert_eq!(commits.len(), 1);
        let (saved_section, revision) = &commits[0];
        assert_eq!(saved_section.status(), SectionStatus::Generated);
        assert_eq!(revision.version(), 1);
        assert_eq!(revision.content(), outcome.content);
    }

    #[tokio::test]
    async fn preview_mode_writes_nothing() {
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![8.0]));
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator, sections.clone());

        let project = test_project();
        let section = Section::new(project.id(), "Introduction");

        let outcome = driver
            .run(&section, &project, &CycleRequest::new().with_persist(false))
            .await
            .unwrap();

        assert!(!outcome.persisted);
        // Version reported is the terminal version even though nothing saved
        assert_eq!(outcome.version, 1);
        assert!(sections.commits().is_empty());
    }

    #[tokio::test]
    async fn dislike_shortcut_makes_exactly_one_refine_call() {
        // Scenario D
        let generator = Arc::new(ScriptedGenerator::new());
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator.clone(), sections.clone());

        let project = test_project();
        let mut section = Section::new(project.id(), "Introduction");
        section.apply_cycle("stored draft", 2, SectionStatus::Generated);

        let request = CycleRequest::new()
            .with_feedback(Feedback::Dislike)
            .with_current_content("X")
            .with_user_prompt("make formal");

        let outcome = driver.run(&section, &project, &request).await.unwrap();

        let calls = generator.call_log();
        assert_eq!(calls.refine, 1);
        assert_eq!(calls.generate, 0);
        assert_eq!(calls.evaluate, 0);
        assert_eq!(calls.last_refine_base.as_deref(), Some("X"));
        assert_eq!(calls.last_refine_user_prompt.as_deref(), Some("make formal"));

        assert_eq!(outcome.version, 3); // prior + 1
        assert_eq!(outcome.score, None);
        let commits = sections.commits();
        assert_eq!(commits[0].1.score(), None);
    }

    #[tokio::test]
    async fn caller_context_overrides_section_assembly() {
        // Whole-project generation seeds each bare section with the project
        // title instead of an empty context
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![8.0]));
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator.clone(), sections);

        let project = test_project();
        let section = Section::new(project.id(), "Introduction").with_summary("stored summary");

        let request = CycleRequest::new().with_context_summary("Project: Quarterly Report");
        driver.run(&section, &project, &request).await.unwrap();

        assert_eq!(
            generator.call_log().last_context_summary.as_deref(),
            Some("Project: Quarterly Report")
        );
    }

    #[tokio::test]
    async fn like_shortcut_bypasses_the_machine() {
        let generator = Arc::new(ScriptedGenerator::new());
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator.clone(), sections.clone());

        let project = test_project();
        let mut section = Section::new(project.id(), "Introduction");
        section.apply_cycle("the draft I liked", 3, SectionStatus::Refined);

        let request = CycleRequest::new().with_feedback(Feedback::Like);
        let outcome = driver.run(&section, &project, &request).await.unwrap();

        let calls = generator.call_log();
        assert_eq!(calls.generate + calls.evaluate + calls.refine, 0);
        assert_eq!(outcome.content, "the draft I liked");
        assert_eq!(outcome.version, 4);
        assert_eq!(outcome.score, None);
    }

    #[tokio::test]
    async fn like_with_no_content_anywhere_generates_once() {
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![9.0]));
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator.clone(), sections.clone());

        let project = test_project();
        let section = Section::new(project.id(), "Introduction");

        let request = CycleRequest::new().with_feedback(Feedback::Like);
        let outcome = driver.run(&section, &project, &request).await.unwrap();

        assert_eq!(generator.call_log().generate, 1);
        assert_eq!(outcome.content, "generated:Introduction");
    }

    #[tokio::test]
    async fn capability_failure_writes_nothing() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .with_generate_error(GenerationError::quota_exceeded("rpm")),
        );
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator, sections.clone());

        let project = test_project();
        let section = Section::new(project.id(), "Introduction");

        let err = driver
            .run(&section, &project, &CycleRequest::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Generation(GenerationError::QuotaExceeded(_))
        ));
        assert!(sections.commits().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_is_reported_not_swallowed() {
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![8.0]));
        let sections = Arc::new(RecordingSections::failing());
        let driver = driver_with(generator, sections);

        let project = test_project();
        let section = Section::new(project.id(), "Introduction");

        let err = driver
            .run(&section, &project, &CycleRequest::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Persistence(_)));
        // The caller's section is untouched; only the repository clone moved
        assert!(section.content().is_none());
    }

    #[tokio::test]
    async fn rerun_on_existing_content_lands_on_refined() {
        let generator = Arc::new(ScriptedGenerator::new().with_scores(vec![8.0]));
        let sections = Arc::new(RecordingSections::default());
        let driver = driver_with(generator, sections.clone());

        let project = test_project();
        let mut section = Section::new(project.id(), "Introduction");
        section.apply_cycle("old", 1, SectionStatus::Generated);

        driver
            .run(&section, &project, &CycleRequest::new())
            .await
            .unwrap();

        assert_eq!(sections.commits()[0].0.status(), SectionStatus::Refined);
    }

    mod context_summary {
        use super::*;

        #[test]
        fn explicit_prompt_wins() {
            let section = Section::new(ProjectId::generate(), "Intro")
                .with_summary("stored summary")
                .with_guidance("stored guidance");

            let context = build_context_summary(&section, Some("  focus on costs  "));
            assert_eq!(context, "focus on costs");
        }

        #[test]
        fn blank_prompt_falls_through_to_stored_fields() {
            let section = Section::new(ProjectId::generate(), "Intro")
                .with_summary("stored summary")
                .with_guidance("stored guidance");

            let context = build_context_summary(&section, Some("   "));
            assert_eq!(context, "stored summary\n\nGuidance: stored guidance");
        }

        #[test]
        fn falls_back_to_content_preview() {
            let mut section = Section::new(ProjectId::generate(), "Intro");
            section.apply_cycle("a".repeat(3000), 1, SectionStatus::Generated);

            let context = build_context_summary(&section, None);
            assert!(context.starts_with("Current content: "));
            assert_eq!(context.len(), "Current content: ".len() + 2000);
        }

        #[test]
        fn empty_when_nothing_available() {
            let section = Section::new(ProjectId::generate(), "Intro");
            assert_eq!(build_context_summary(&section, None), "");
        }
    }
}
