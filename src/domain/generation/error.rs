//! Generation capability error types

use thiserror::Error;

/// Errors surfaced by the text-generation capability.
///
/// Quota failures are distinguished so the caller can tell "try again later"
/// apart from a terminal failure. Malformed evaluation output is NOT an error
/// here: implementations recover it locally with `Evaluation::neutral`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GenerationError {
    #[error("Generation quota exhausted: {0}")]
    QuotaExceeded(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

impl GenerationError {
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::QuotaExceeded(message.into())
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Whether the caller may retry later
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::QuotaExceeded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GenerationError::quota_exceeded("requests per minute");
        assert_eq!(
            err.to_string(),
            "Generation quota exhausted: requests per minute"
        );

        let err = GenerationError::failed("connection reset");
        assert_eq!(err.to_string(), "Generation failed: connection reset");
    }

    #[test]
    fn test_retryable() {
        assert!(GenerationError::quota_exceeded("rpm").is_retryable());
        assert!(!GenerationError::failed("boom").is_retryable());
    }
}
