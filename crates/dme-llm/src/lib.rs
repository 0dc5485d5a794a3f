//! DME LLM Provider Layer
//!
//! Text-completion collaborators for model-based order extraction.
//!
//! # Architecture
//!
//! Every backend implements [`TextCompletion`]: it takes a system
//! instruction, the user content and an optional JSON schema constraint, and
//! returns a single text payload that is expected to be a JSON object.
//! Parsing and validating that payload is the extractor's job.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OllamaProvider`: Local Ollama `/api/generate` with a `format` schema
//! - `OpenAiProvider`: OpenAI-compatible `/v1/chat/completions` with a
//!   strict `json_schema` response format
//!
//! # Examples
//!
//! ```
//! use dme_llm::{CompletionRequest, MockProvider, TextCompletion};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"device": "CPAP"}"#);
//! let request = CompletionRequest::new("Extract the order.", "Patient needs a CPAP.");
//! let result = provider.complete(&request).await.unwrap();
//! assert_eq!(result, r#"{"device": "CPAP"}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod ollama;
pub mod openai;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// The HTTP client gave up waiting for a response
    #[error("Request timed out after {0}s")]
    Timeout(u64),

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// API key environment variable is unset
    #[error("API key not found in environment variable {0}")]
    MissingApiKey(String),
}

impl LlmError {
    /// Classify a reqwest transport error
    pub(crate) fn from_transport(e: reqwest::Error, timeout_secs: u64) -> Self {
        if e.is_timeout() {
            LlmError::Timeout(timeout_secs)
        } else {
            LlmError::Communication(format!("Request failed: {}", e))
        }
    }
}

/// Named JSON schema constraining the completion output
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name, used by providers that require one
    pub name: String,
    /// JSON Schema document
    pub schema: Value,
}

/// A single schema-constrained completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,
    /// User content (the note text)
    pub user: String,
    /// Optional output schema
    pub schema: Option<ResponseSchema>,
}

impl CompletionRequest {
    /// Create a request without a schema constraint
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            schema: None,
        }
    }

    /// Constrain the output to a named JSON schema
    pub fn with_schema(mut self, name: impl Into<String>, schema: Value) -> Self {
        self.schema = Some(ResponseSchema {
            name: name.into(),
            schema,
        });
        self
    }
}

/// A text-completion service
///
/// Implementations hold a reusable HTTP client and are safe to share across
/// tasks. Dropping the returned future cancels the in-flight request.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Name of the backing model, for logging
    fn model_name(&self) -> &str;

    /// Produce a single text payload for the request
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

/// Mock LLM provider for deterministic testing
///
/// This provider returns pre-configured responses without making any network calls.
/// Responses are keyed by the request's user content.
///
/// # Examples
///
/// ```
/// use dme_llm::{CompletionRequest, MockProvider, TextCompletion};
///
/// # tokio_test::block_on(async {
/// let mut provider = MockProvider::default();
/// provider.add_response("note one", "response1");
/// provider.add_response("note two", "response2");
///
/// let one = CompletionRequest::new("system", "note one");
/// let two = CompletionRequest::new("system", "note two");
/// assert_eq!(provider.complete(&one).await.unwrap(), "response1");
/// assert_eq!(provider.complete(&two).await.unwrap(), "response2");
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, LlmError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific response for a given user content
    pub fn add_response(&mut self, user: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific user content
    pub fn add_error(&mut self, user: impl Into<String>, error: LlmError) {
        self.responses
            .lock()
            .unwrap()
            .insert(user.into(), Err(error));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("{}")
    }
}

#[async_trait]
impl TextCompletion for MockProvider {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());

        let responses = self.responses.lock().unwrap();
        match responses.get(&request.user) {
            Some(response) => response.clone(),
            None => Ok(self.default_response.clone()),
        }
    }
}
