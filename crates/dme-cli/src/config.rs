//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use dme_extractor::ExtractorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extraction strategy and model settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Where extracted records are sent
    #[serde(default)]
    pub submission: Submission,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Submission settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Endpoint that receives one POST per record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".dme").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize configuration to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        if let Some(endpoint) = &self.submission.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(CliError::Config(format!(
                    "submission.endpoint '{}' must be an http(s) URL",
                    endpoint
                )));
            }
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Json,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Json
}

#[cfg(test)]
mod tests {
    use super::*;
    use dme_extractor::{ProviderKind, Strategy};

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extractor.strategy, Strategy::RuleBased);
        assert!(config.submission.endpoint.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let config: Config = toml::from_str(
            r#"
            [extractor]
            strategy = "model"

            [extractor.model]
            provider = "openai"
            model = "gpt-4o-mini"

            [submission]
            endpoint = "http://localhost:9000/orders"

            [settings]
            format = "table"
            "#,
        )
        .unwrap();

        assert_eq!(config.extractor.strategy, Strategy::Model);
        assert_eq!(config.extractor.model.provider, ProviderKind::OpenAi);
        assert_eq!(config.extractor.model.request_timeout_secs, 60);
        assert_eq!(
            config.submission.endpoint.as_deref(),
            Some("http://localhost:9000/orders")
        );
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert!(config.settings.color);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.submission.endpoint = Some("https://intake.example.com/orders".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_invalid_submission_endpoint() {
        let mut config = Config::default();
        config.submission.endpoint = Some("ftp://example.com".to_string());
        assert!(matches!(config.validate(), Err(CliError::Config(_))));
    }
}
