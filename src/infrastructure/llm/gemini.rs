//! Gemini-backed section generator
//!
//! Implements the three capability operations against the Google
//! `generateContent` endpoint. Prompt wording mirrors what the document
//! builder expects from the model: a single flowing paragraph per section,
//! JSON-only evaluations, refinements that preserve meaning.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::http_client::HttpClientTrait;
use crate::domain::generation::{Evaluation, GenerationError, SectionGenerator};
use crate::domain::project::DocType;

/// Gemini API provider for section generation
#[derive(Debug)]
pub struct GeminiGenerator<C: HttpClientTrait> {
    client: C,
    api_key: String,
    model: String,
    base_url: String,
}

impl<C: HttpClientTrait> GeminiGenerator<C> {
    pub fn new(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn generate_content_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn prompt(&self, prompt: String) -> Result<String, GenerationError> {
        let body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }]
        });

        let response = self
            .client
            .post_json(&self.generate_content_url(), &body)
            .await?;

        extract_text(&response)
    }
}

/// Pull the first candidate's text out of a generateContent response
fn extract_text(response: &serde_json::Value) -> Result<String, GenerationError> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .map(|t| t.trim().to_string())
        .ok_or_else(|| GenerationError::failed("Gemini response contained no text candidate"))
}

/// Strip markdown code fences the model wraps around JSON answers
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: f64,
    improvement_focus: String,
}

/// Parse an evaluation answer, substituting the neutral fallback for
/// anything unreadable. A malformed evaluation must never abort a run.
fn parse_evaluation(text: &str) -> Evaluation {
    let cleaned = strip_code_fences(text);

    match serde_json::from_str::<RawEvaluation>(&cleaned) {
        Ok(raw) => Evaluation::new(raw.score, raw.improvement_focus),
        Err(err) => {
            warn!(error = %err, "unparseable evaluation output, using neutral fallback");
            Evaluation::neutral()
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> SectionGenerator for GeminiGenerator<C> {
    async fn generate(
        &self,
        section_title: &str,
        doc_type: DocType,
        context_summary: &str,
    ) -> Result<String, GenerationError> {
        let doc_type_upper = doc_type.as_str().to_uppercase();
        let prompt = format!(
            r#"Generate detailed content for a {doc_type_upper} document section titled:

"{section_title}"

Context:
"""{context_summary}"""

Requirements:
- 180-220 words
- Professional and coherent tone
- Single flowing paragraph
- No repetition
- Do not include the section title in the output
- Match the expected style for {doc_type_upper}"#
        );

        debug!(section_title, %doc_type, "generating section content");
        self.prompt(prompt).await
    }

    async fn evaluate(&self, content: &str) -> Result<Evaluation, GenerationError> {
        let prompt = format!(
            r#"Evaluate the following document section and respond only in JSON.

Text:
"""{content}"""

Score 1-10 based on:
- clarity
- relevance
- structure
- depth

JSON response format:
{{
  "score": <number>,
  "improvement_focus": "<one short sentence>"
}}"#
        );

        let answer = self.prompt(prompt).await?;
        Ok(parse_evaluation(&answer))
    }

    async fn refine(
        &self,
        content: &str,
        improvement_focus: &str,
        user_prompt: Option<&str>,
    ) -> Result<String, GenerationError> {
        let request = user_prompt.unwrap_or(improvement_focus);
        let prompt = format!(
            r#"Improve the following section.

USER REQUEST:
"{request}"

CURRENT TEXT:
"""{content}"""

Rules:
- Preserve meaning
- Improve clarity and structure
- Maintain similar length
- Return only the improved text"#
        );

        debug!("refining section content");
        self.prompt(prompt).await
    }
}
