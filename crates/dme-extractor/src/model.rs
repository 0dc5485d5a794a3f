//! Model-based extraction through a text-completion collaborator

use crate::error::{ExtractorError, UpstreamError};
use crate::parser::parse_model_response;
use crate::prompt::PromptBuilder;
use crate::schema::{OrderSchema, SCHEMA_NAME};
use dme_domain::{Device, NormalizedOrder};
use dme_llm::{CompletionRequest, TextCompletion};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Extracts orders by asking a model for schema-constrained JSON
///
/// Adds no timeout of its own: the provider's HTTP timeout surfaces as an
/// upstream error, and dropping the future cancels the request.
#[derive(Clone)]
pub struct ModelExtractor {
    provider: Arc<dyn TextCompletion>,
    schema: OrderSchema,
    system_prompt: String,
}

impl ModelExtractor {
    /// Create a model extractor
    pub fn new(provider: Arc<dyn TextCompletion>, schema: OrderSchema) -> Self {
        let system_prompt = PromptBuilder::new(schema).build();
        Self {
            provider,
            schema,
            system_prompt,
        }
    }

    /// The schema requested from the model
    pub fn schema(&self) -> &OrderSchema {
        &self.schema
    }

    /// Name of the backing model
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Extract an order from note text
    pub async fn extract(&self, note: &str) -> Result<NormalizedOrder, ExtractorError> {
        if note.trim().is_empty() {
            return Err(ExtractorError::InvalidInput(
                "note text is empty".to_string(),
            ));
        }

        let request = CompletionRequest::new(self.system_prompt.as_str(), note)
            .with_schema(SCHEMA_NAME, self.schema.to_json_schema());

        debug!(
            "Requesting extraction from model '{}', note length {}",
            self.provider.model_name(),
            note.len()
        );

        let response = self.provider.complete(&request).await.map_err(|e| {
            warn!("Model '{}' call failed: {}", self.provider.model_name(), e);
            UpstreamError::Llm(e)
        })?;

        debug!("LLM response length: {} chars", response.len());

        let draft = parse_model_response(&response, &self.schema).map_err(|e| {
            warn!("Model '{}' returned unusable output: {}", self.provider.model_name(), e);
            e
        })?;

        let order = draft.normalize();
        if order.device() == &Device::Unknown {
            warn!("Model reported no recognized device");
        }

        info!(
            "Model extraction complete: device '{}' via {}",
            order.device(),
            self.schema.version()
        );

        Ok(order)
    }
}

impl std::fmt::Debug for ModelExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelExtractor")
            .field("model", &self.provider.model_name())
            .field("schema", &self.schema)
            .finish()
    }
}
