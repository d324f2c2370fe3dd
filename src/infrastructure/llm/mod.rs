//! LLM backend implementations

mod gemini;
mod http_client;

pub use gemini::GeminiGenerator;
pub use http_client::{HttpClient, HttpClientTrait};
