//! Configuration for the Extractor

use serde::{Deserialize, Serialize};

/// Extraction strategy, selected once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Deterministic keyword and pattern rules
    #[default]
    RuleBased,
    /// Schema-constrained text completion
    Model,
}

/// Text-completion backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Ollama `/api/generate`
    #[default]
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    #[serde(rename = "openai")]
    OpenAi,
}

/// Settings for the model-based strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Backend to call
    pub provider: ProviderKind,

    /// API endpoint; the provider's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Model name
    pub model: String,

    /// Environment variable holding the API key (OpenAI only)
    pub api_key_env: String,

    /// HTTP timeout for a single completion (seconds)
    pub request_timeout_secs: u64,

    /// Ask the model for the CPAP-only fields as well
    pub include_cpap_fields: bool,
}

impl ModelConfig {
    /// Endpoint to use, falling back to the provider default
    pub fn endpoint(&self) -> &str {
        match (&self.endpoint, self.provider) {
            (Some(endpoint), _) => endpoint,
            (None, ProviderKind::Ollama) => dme_llm::ollama::DEFAULT_ENDPOINT,
            (None, ProviderKind::OpenAi) => dme_llm::openai::DEFAULT_ENDPOINT,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            endpoint: None,
            model: "llama3.1".to_string(),
            api_key_env: dme_llm::openai::DEFAULT_API_KEY_ENV.to_string(),
            request_timeout_secs: dme_llm::ollama::DEFAULT_TIMEOUT_SECS,
            include_cpap_fields: true,
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Which strategy `OrderExtractor::from_config` builds
    pub strategy: Strategy,

    /// Model-based strategy settings
    pub model: ModelConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.model.trim().is_empty() {
            return Err("model.model must not be empty".to_string());
        }
        if self.model.request_timeout_secs == 0 {
            return Err("model.request_timeout_secs must be greater than 0".to_string());
        }
        let endpoint = self.model.endpoint();
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            return Err(format!("model.endpoint '{}' must be an http(s) URL", endpoint));
        }
        if self.model.provider == ProviderKind::OpenAi && self.model.api_key_env.trim().is_empty() {
            return Err("model.api_key_env must be set for the openai provider".to_string());
        }
        Ok(())
    }

    /// Local preset: model strategy against a local Ollama
    pub fn local_model(model: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Model,
            model: ModelConfig {
                model: model.into(),
                ..ModelConfig::default()
            },
        }
    }

    /// Hosted preset: model strategy against the OpenAI API
    pub fn hosted_model(model: impl Into<String>) -> Self {
        Self {
            strategy: Strategy::Model,
            model: ModelConfig {
                provider: ProviderKind::OpenAi,
                model: model.into(),
                request_timeout_secs: 120,
                ..ModelConfig::default()
            },
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
