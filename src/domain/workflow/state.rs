//! Per-run workflow state

use crate::domain::project::DocType;
use crate::domain::section::SectionId;

/// Caller-supplied signal that can short-circuit routing.
/// Wire values go through `parse`; the enum itself never hits the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Feedback {
    /// No explicit signal; routing follows scores and attempt budget
    #[default]
    Pending,
    /// Accept the current draft
    Like,
    /// Force a refinement pass
    Dislike,
}

impl Feedback {
    /// Parse the wire value, defaulting to Pending when absent or
    /// unrecognized ("generate" included).
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("like") => Self::Like,
            Some("dislike") => Self::Dislike,
            _ => Self::Pending,
        }
    }
}

/// Mutable state of one section during one generation/refinement run.
///
/// Created fresh for every driver invocation, owned exclusively by that run,
/// and discarded once the terminal state has been mapped to persistence.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    /// Correlation key; persistence stays the source of truth for the section
    pub section_id: SectionId,
    /// Immutable input for this run
    pub section_title: String,
    /// Immutable input for this run
    pub doc_type: DocType,
    /// Current draft; None before the first generation
    pub content: Option<String>,
    /// Monotonically increasing, incremented exactly once per refine stage
    pub version: u32,
    /// Quality estimate in [1,10]; None until first evaluation
    pub score: Option<f64>,
    /// Caller signal consulted by the routing policy
    pub user_feedback: Feedback,
    /// Caller instruction, overwritten by each evaluation's improvement hint
    pub user_prompt: Option<String>,
    /// Driver-assembled guidance, passed only to the generation stage
    pub context_summary: Option<String>,
    /// Refine-stage executions so far in this run
    pub attempts: u32,
    /// Retry ceiling
    pub max_attempts: u32,
}

impl WorkflowState {
    pub fn new(section_id: SectionId, section_title: impl Into<String>, doc_type: DocType) -> Self {
        Self {
            section_id,
            section_title: section_title.into(),
            doc_type,
            content: None,
            version: 1,
            score: None,
            user_feedback: Feedback::Pending,
            user_prompt: None,
            context_summary: None,
            attempts: 0,
            max_attempts: 3,
        }
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = content;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn with_feedback(mut self, feedback: Feedback) -> Self {
        self.user_feedback = feedback;
        self
    }

    pub fn with_user_prompt(mut self, user_prompt: Option<String>) -> Self {
        self.user_prompt = user_prompt;
        self
    }

    pub fn with_context_summary(mut self, context_summary: impl Into<String>) -> Self {
        self.context_summary = Some(context_summary.into());
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_parse() {
        assert_eq!(Feedback::parse(Some("like")), Feedback::Like);
        assert_eq!(Feedback::parse(Some("dislike")), Feedback::Dislike);
        assert_eq!(Feedback::parse(Some("generate")), Feedback::Pending);
        assert_eq!(Feedback::parse(Some("meh")), Feedback::Pending);
        assert_eq!(Feedback::parse(None), Feedback::Pending);
    }

    #[test]
    fn test_fresh_state_defaults() {
        let state = WorkflowState::new(SectionId::generate(), "Introduction", DocType::Docx);

        assert!(state.content.is_none());
        assert!(state.score.is_none());
        assert_eq!(state.version, 1);
        assert_eq!(state.attempts, 0);
        assert_eq!(state.user_feedback, Feedback::Pending);
    }
}
