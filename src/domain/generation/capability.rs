//! Text-generation capability boundary
//!
//! The workflow state machine only ever talks to this trait; the concrete
//! backend (Gemini over HTTP, scripted doubles in tests) stays behind it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GenerationError;
use crate::domain::project::DocType;

/// Score assigned to a malformed or missing evaluation. Sits exactly on the
/// refine threshold so an unreadable evaluation defaults toward acceptance.
pub const NEUTRAL_SCORE: f64 = 7.5;

/// Improvement hint paired with the neutral score
pub const NEUTRAL_IMPROVEMENT_FOCUS: &str = "Improve clarity and flow";

/// Result of evaluating a draft: a 1-10 quality score plus one short
/// improvement direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: f64,
    pub improvement_focus: String,
}

impl Evaluation {
    pub fn new(score: f64, improvement_focus: impl Into<String>) -> Self {
        Self {
            score,
            improvement_focus: improvement_focus.into(),
        }
    }

    /// Fallback used when the evaluator's output cannot be parsed
    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            improvement_focus: NEUTRAL_IMPROVEMENT_FOCUS.to_string(),
        }
    }
}

/// Capability consumed by the section workflow: three operations, all
/// opaque, all possibly-failing remote calls.
#[async_trait]
pub trait SectionGenerator: Send + Sync + std::fmt::Debug {
    /// Produce a fresh draft for a titled section
    async fn generate(
        &self,
        section_title: &str,
        doc_type: DocType,
        context_summary: &str,
    ) -> Result<String, GenerationError>;

    /// Score a draft and suggest an improvement direction.
    ///
    /// Implementations must map unparseable model output to
    /// `Evaluation::neutral()` rather than returning an error.
    async fn evaluate(&self, content: &str) -> Result<Evaluation, GenerationError>;

    /// Rework a draft following an improvement focus and, when present, an
    /// explicit user instruction
    async fn refine(
        &self,
        content: &str,
        improvement_focus: &str,
        user_prompt: Option<&str>,
    ) -> Result<String, GenerationError>;
}

#[cfg(test)]
pub mod scripted {
    //! Deterministic generator double for workflow tests

    use std::sync::Mutex;

    use super::*;

    /// Scripted generator: fixed generate/refine text, a queue of evaluation
    /// scores, and call counters for assertions.
    #[derive(Debug, Default)]
    pub struct ScriptedGenerator {
        scores: Mutex<Vec<f64>>,
        fail_generate: Option<GenerationError>,
        fail_refine: Option<GenerationError>,
        pub calls: Mutex<CallLog>,
    }

    #[derive(Debug, Default, Clone)]
    pub struct CallLog {
        pub generate: u32,
        pub evaluate: u32,
        pub refine: u32,
        pub last_refine_base: Option<String>,
        pub last_refine_focus: Option<String>,
        pub last_refine_user_prompt: Option<String>,
        pub last_context_summary: Option<String>,
    }

    impl ScriptedGenerator {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue evaluation scores, consumed front to back; the last score
        /// repeats once the queue runs dry.
        pub fn with_scores(self, scores: Vec<f64>) -> Self {
            *self.scores.lock().unwrap() = scores;
            self
        }

        pub fn with_generate_error(mut self, error: GenerationError) -> Self {
            self.fail_generate = Some(error);
            self
        }

        pub fn with_refine_error(mut self, error: GenerationError) -> Self {
            self.fail_refine = Some(error);
            self
        }

        pub fn call_log(&self) -> CallLog {
            self.calls.lock().unwrap().clone()
        }

        fn next_score(&self) -> f64 {
            let mut scores = self.scores.lock().unwrap();
            if scores.len() > 1 {
                scores.remove(0)
            } else {
                scores.first().copied().unwrap_or(NEUTRAL_SCORE)
            }
        }
    }

    #[async_trait]
    impl SectionGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            section_title: &str,
            _doc_type: DocType,
            context_summary: &str,
        ) -> Result<String, GenerationError> {
            if let Some(ref err) = self.fail_generate {
                return Err(err.clone());
            }
            let mut calls = self.calls.lock().unwrap();
            calls.generate += 1;
            calls.last_context_summary = Some(context_summary.to_string());
            Ok(format!("generated:{}", section_title))
        }

        async fn evaluate(&self, _content: &str) -> Result<Evaluation, GenerationError> {
            self.calls.lock().unwrap().evaluate += 1;
            Ok(Evaluation::new(self.next_score(), "tighten the opening"))
        }

        async fn refine(
            &self,
            content: &str,
            improvement_focus: &str,
            user_prompt: Option<&str>,
        ) -> Result<String, GenerationError> {
            if let Some(ref err) = self.fail_refine {
                return Err(err.clone());
            }
            let mut calls = self.calls.lock().unwrap();
            calls.refine += 1;
            calls.last_refine_base = Some(content.to_string());
            calls.last_refine_focus = Some(improvement_focus.to_string());
            calls.last_refine_user_prompt = user_prompt.map(|p| p.to_string());
            Ok(format!("refined:{}", content))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_evaluation() {
        let eval = Evaluation::neutral();
        assert_eq!(eval.score, 7.5);
        assert_eq!(eval.improvement_focus, "Improve clarity and flow");
    }

    #[tokio::test]
    async fn test_scripted_generator_scores_in_order() {
        use scripted::ScriptedGenerator;

        let generator = ScriptedGenerator::new().with_scores(vec![4.0, 9.0]);
        assert_eq!(generator.evaluate("x").await.unwrap().score, 4.0);
        assert_eq!(generator.evaluate("x").await.unwrap().score, 9.0);
        // Last score repeats
        assert_eq!(generator.evaluate("x").await.unwrap().score, 9.0);
    }
}
