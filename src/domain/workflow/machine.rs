//! Section workflow state machine
//!
//! Drives one section's draft through generate -> evaluate -> refine stages
//! until the routing policy stops it. The machine owns its `WorkflowState`
//! for the duration of the run and never touches persistence.

use tracing::debug;

use super::state::{Feedback, WorkflowState};
use crate::domain::generation::{GenerationError, SectionGenerator};

/// Workflow tuning, passed explicitly so per-tenant settings can coexist
#[derive(Debug, Clone, Copy)]
pub struct WorkflowConfig {
    /// Evaluations below this score trigger a refine pass
    pub score_threshold: f64,
    /// Refine budget per run
    pub max_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            score_threshold: 7.5,
            max_attempts: 3,
        }
    }
}

/// Transition chosen after an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Refine,
    Done,
}

/// Routing policy applied after every evaluate stage.
///
/// Pure function of the inputs; checks run in strict priority order and the
/// first match wins: like beats dislike beats attempt-limit beats score
/// threshold beats default accept.
pub fn route_after_evaluate(
    feedback: Feedback,
    attempts: u32,
    max_attempts: u32,
    score: Option<f64>,
    score_threshold: f64,
) -> Route {
    if feedback == Feedback::Like {
        return Route::Done;
    }

    if feedback == Feedback::Dislike {
        return Route::Refine;
    }

    if attempts >= max_attempts {
        return Route::Done;
    }

    if let Some(score) = score {
        if score < score_threshold {
            return Route::Refine;
        }
    }

    Route::Done
}

/// The three-stage section workflow over a generation capability
#[derive(Debug)]
pub struct SectionWorkflow<'a> {
    generator: &'a dyn SectionGenerator,
    config: WorkflowConfig,
}

impl<'a> SectionWorkflow<'a> {
    pub fn new(generator: &'a dyn SectionGenerator, config: WorkflowConfig) -> Self {
        Self { generator, config }
    }

    /// Run the machine to completion. Entry is always the generate stage;
    /// termination is guaranteed because every refine increments `attempts`
    /// and the attempt-limit route halts once the budget is spent.
    ///
    /// Any capability failure aborts the run and discards the state.
    pub async fn run(&self, mut state: WorkflowState) -> Result<WorkflowState, GenerationError> {
        state.max_attempts = self.config.max_attempts;

        self.generate(&mut state).await?;

        loop {
            self.evaluate(&mut state).await?;

            let route = route_after_evaluate(
                state.user_feedback,
                state.attempts,
                state.max_attempts,
                state.score,
                self.config.score_threshold,
            );

            match route {
                Route::Done => break,
                Route::Refine => {
                    self.refine(&mut state).await?;
                    // A dislike forces one refine; after that the scores and
                    // the attempt budget govern, so the loop stays bounded
                    if state.user_feedback == Feedback::Dislike {
                        state.user_feedback = Feedback::Pending;
                    }
                }
            }
        }

        Ok(state)
    }

    /// generate -> evaluate: unconditional single edge. Sets the baseline
    /// content, leaves the version untouched.
    async fn generate(&self, state: &mut WorkflowState) -> Result<(), GenerationError> {
        let context = state.context_summary.as_deref().unwrap_or("");
        let content = self
            .generator
            .generate(&state.section_title, state.doc_type, context)
            .await?;

        debug!(
            section_id = %state.section_id,
            chars = content.len(),
            "generated section draft"
        );
        state.content = Some(content);
        Ok(())
    }

    /// Scores the current draft and overwrites `user_prompt` with the
    /// evaluator's improvement hint before routing.
    async fn evaluate(&self, state: &mut WorkflowState) -> Result<(), GenerationError> {
        let content = state.content.as_deref().unwrap_or("");
        let evaluation = self.generator.evaluate(content).await?;

        debug!(
            section_id = %state.section_id,
            score = evaluation.score,
            "evaluated section draft"
        );
        state.score = Some(evaluation.score);
        state.user_prompt = Some(evaluation.improvement_focus);
        Ok(())
    }

    /// refine -> evaluate: reworks the draft, bumps version and attempts by
    /// exactly one each, then loops back so the new draft gets re-scored.
    async fn refine(&self, state: &mut WorkflowState) -> Result<(), GenerationError> {
        let content = state.content.as_deref().unwrap_or("");
        let focus = state.user_prompt.clone().unwrap_or_default();
        let refined = self
            .generator
            .refine(content, &focus, state.user_prompt.as_deref())
            .await?;

        state.content = Some(refined);
        state.version += 1;
        state.attempts += 1;

        debug!(
            section_id = %state.section_id,
            version = state.version,
            attempts = state.attempts,
            "refined section draft"
        );
        Ok(())
    }
}
