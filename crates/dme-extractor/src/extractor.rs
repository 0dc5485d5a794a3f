//! Strategy dispatch over the rule-based and model-based extractors

use crate::config::{ExtractorConfig, ProviderKind, Strategy};
use crate::error::ExtractorError;
use crate::model::ModelExtractor;
use crate::rule_based::RuleBasedExtractor;
use crate::schema::OrderSchema;
use dme_domain::NormalizedOrder;
use dme_llm::{OllamaProvider, OpenAiProvider, TextCompletion};
use std::sync::Arc;
use tracing::info;

/// The extractor selected at startup
///
/// Call sites use [`OrderExtractor::extract`] regardless of the variant.
#[derive(Debug, Clone)]
pub enum OrderExtractor {
    /// Deterministic rules
    RuleBased(RuleBasedExtractor),
    /// Schema-constrained text completion
    ModelBased(ModelExtractor),
}

impl OrderExtractor {
    /// Build the extractor named by the configuration
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        match config.strategy {
            Strategy::RuleBased => {
                info!("Using rule-based extraction");
                Ok(OrderExtractor::RuleBased(RuleBasedExtractor::new()))
            }
            Strategy::Model => {
                let model = &config.model;
                let provider: Arc<dyn TextCompletion> = match model.provider {
                    ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                        model.endpoint(),
                        &model.model,
                        model.request_timeout_secs,
                    )?),
                    ProviderKind::OpenAi => Arc::new(OpenAiProvider::from_env(
                        model.endpoint(),
                        &model.model,
                        &model.api_key_env,
                        model.request_timeout_secs,
                    )?),
                };
                info!(
                    "Using model-based extraction with '{}' at {}",
                    model.model,
                    model.endpoint()
                );
                Ok(Self::with_provider(provider, model.include_cpap_fields))
            }
        }
    }

    /// Build a model-based extractor around an existing provider
    pub fn with_provider(provider: Arc<dyn TextCompletion>, include_cpap_fields: bool) -> Self {
        OrderExtractor::ModelBased(ModelExtractor::new(
            provider,
            OrderSchema::new(include_cpap_fields),
        ))
    }

    /// Strategy of this extractor
    pub fn strategy(&self) -> Strategy {
        match self {
            OrderExtractor::RuleBased(_) => Strategy::RuleBased,
            OrderExtractor::ModelBased(_) => Strategy::Model,
        }
    }

    /// Extract an order from note text
    pub async fn extract(&self, note: &str) -> Result<NormalizedOrder, ExtractorError> {
        match self {
            OrderExtractor::RuleBased(extractor) => extractor.extract(note),
            OrderExtractor::ModelBased(extractor) => extractor.extract(note).await,
        }
    }
}

impl Default for OrderExtractor {
    fn default() -> Self {
        OrderExtractor::RuleBased(RuleBasedExtractor::new())
    }
}
