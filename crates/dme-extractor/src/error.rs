//! Error types for the Extractor

use dme_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Note text is empty or whitespace-only
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The text-completion collaborator failed or returned unusable output
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures on the model-based path
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport, status, timeout or envelope failure from the provider
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The provider answered with no content
    #[error("Empty response from model")]
    EmptyResponse,

    /// The content did not parse or did not match the order schema
    #[error("Schema violation: {0}")]
    Schema(String),
}

/// Failure class of an [`ExtractorError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or whitespace-only note
    InvalidInput,
    /// Model path failure
    Upstream,
    /// Bad configuration
    Config,
}

impl ExtractorError {
    /// Failure class, for callers that branch on the kind of error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractorError::InvalidInput(_) => ErrorKind::InvalidInput,
            ExtractorError::Upstream(_) => ErrorKind::Upstream,
            ExtractorError::Config(_) => ErrorKind::Config,
        }
    }

    /// Whether the model call timed out
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            ExtractorError::Upstream(UpstreamError::Llm(LlmError::Timeout(_)))
        )
    }
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        ExtractorError::Upstream(UpstreamError::Llm(e))
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(e: serde_json::Error) -> Self {
        UpstreamError::Schema(format!("JSON parse error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            ExtractorError::InvalidInput("empty".into()).kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            ExtractorError::from(UpstreamError::EmptyResponse).kind(),
            ErrorKind::Upstream
        );
        assert_eq!(ExtractorError::Config("bad".into()).kind(), ErrorKind::Config);
    }

    #[test]
    fn test_timeout_is_upstream() {
        let err = ExtractorError::from(LlmError::Timeout(30));
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out"));
    }
}
